#![allow(dead_code)]

use breadgrid::{DeleteMode, FormValues, Store, TableDescription};

/// The bread factory's five tables.
pub const FACTORY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Работники (
    id INTEGER PRIMARY KEY,
    ФИО TEXT NOT NULL,
    Должность TEXT NOT NULL,
    Стаж_лет INTEGER DEFAULT 0,
    Контактный_телефон TEXT
);
CREATE TABLE IF NOT EXISTS Ингредиенты (
    id INTEGER PRIMARY KEY,
    Название TEXT NOT NULL,
    Количество_в_кг REAL NOT NULL,
    Поставщик TEXT,
    Стоимость_за_кг_BYN REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS Хлебные_изделия (
    id INTEGER PRIMARY KEY,
    Название_изделия TEXT NOT NULL,
    Ингредиенты TEXT,
    Количество_произведенных_единиц_шт INTEGER DEFAULT 0,
    Дата_производства_dd_mm_yy TEXT
);
CREATE TABLE IF NOT EXISTS Стоимость_и_расценки (
    id INTEGER PRIMARY KEY,
    Название_изделия TEXT NOT NULL,
    Себестоимость_BYN REAL NOT NULL,
    Розничная_цена_BYN REAL NOT NULL,
    Дата_изменения_стоимости_dd_mm_yy TEXT
);
CREATE TABLE IF NOT EXISTS Заказчики (
    id INTEGER PRIMARY KEY,
    Заказчик TEXT NOT NULL,
    Название_заказанного_изделия TEXT NOT NULL,
    Дата_заказа_dd_mm_yy TEXT NOT NULL,
    Дата_исполнения_dd_mm_yy TEXT NOT NULL,
    Количество_заказанных_единиц_шт INTEGER NOT NULL
);
"#;

pub async fn empty_store(mode: DeleteMode) -> Store {
    let mut store = Store::new("sqlite::memory:".into(), mode);
    store.connect().await.unwrap();
    store
}

pub async fn factory_store(mode: DeleteMode) -> Store {
    let store = empty_store(mode).await;
    store.execute_raw(FACTORY_SCHEMA).await.unwrap();
    store
}

pub async fn describe(store: &Store, table: &str) -> TableDescription {
    store.describe_table(table).await.unwrap()
}

pub fn form(pairs: &[(&str, &str)]) -> FormValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn flour() -> FormValues {
    form(&[
        ("Название", "Мука"),
        ("Количество_в_кг", "50"),
        ("Поставщик", "ООО Зерно"),
        ("Стоимость_за_кг_BYN", "1.2"),
    ])
}
