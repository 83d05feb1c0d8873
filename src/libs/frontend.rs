use crate::libs::codec::FormValues;
use crate::libs::schema::ColumnAffinity;

/// One input of an add or edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub column: String,
    pub affinity: ColumnAffinity,
    pub not_null: bool,
    pub initial: String,
}

/// Dialogs the workbench needs from whatever is showing it.
pub trait Frontend {
    /// Collects raw text for every field, or `None` if the operator cancels.
    fn fill_form(&mut self, title: &str, fields: &[FormField]) -> Option<FormValues>;

    fn confirm(&mut self, question: &str) -> bool;

    fn warn(&mut self, message: &str);

    /// Shows a failed statement's message.
    fn report_error(&mut self, message: &str);
}
