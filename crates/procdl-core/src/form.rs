//! Multipart request payload, built fresh for every click.

use crate::selection::{FileSource, SelectedFile};

/// Field every selected file is appended under, so the server receives a list.
pub const FILE_FIELD: &str = "file";
/// Field carrying the checked process type.
pub const PROCESS_TYPE_FIELD: &str = "process_type";

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    File {
        field: String,
        filename: String,
        source: FileSource,
    },
    Field {
        name: String,
        value: String,
    },
}

/// Ordered multipart payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    parts: Vec<FormPart>,
}

impl UploadForm {
    /// Every file under [`FILE_FIELD`] in selection order, then the process type.
    pub fn new(files: &[SelectedFile], process_type: &str) -> Self {
        let mut form = Self::default();
        for file in files {
            form.append_file(FILE_FIELD, file);
        }
        form.append_field(PROCESS_TYPE_FIELD, process_type);
        form
    }

    pub fn append_file(&mut self, field: &str, file: &SelectedFile) {
        self.parts.push(FormPart::File {
            field: field.to_string(),
            filename: file.name.clone(),
            source: file.source.clone(),
        });
    }

    pub fn append_field(&mut self, name: &str, value: &str) {
        self.parts.push(FormPart::Field {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Filenames of the file parts under `field`, in order.
    pub fn filenames(&self, field: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                FormPart::File {
                    field: f, filename, ..
                } if f == field => Some(filename.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All values of the plain field `name`, in order.
    pub fn field_values(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                FormPart::Field { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }
}
