use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};

#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and files from either a urlencoded or a multipart body.
/// A request without a content type yields no fields.
#[derive(Debug, Default)]
pub struct FormFields {
    pub text: Vec<(String, String)>,
    pub files: Vec<UploadedFile>,
}

impl FormFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.text
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }

    /// `true` when the field is present and spelled like a true boolean.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("true" | "True" | "1"))
    }
}

impl<S: Send + Sync> FromRequest<S> for FormFields {
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match content_type {
            None => Ok(FormFields::default()),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| (e.status(), e.body_text()))?;
                let mut fields = FormFields::default();
                while let Some(field) = multipart
                    .next_field()
                    .await
                    .map_err(|e| (e.status(), e.body_text()))?
                {
                    let name = field.name().unwrap_or_default().to_string();
                    match field.file_name().map(str::to_string) {
                        Some(file_name) => {
                            let bytes = field.bytes().await.map_err(|e| (e.status(), e.body_text()))?;
                            fields.files.push(UploadedFile {
                                field: name,
                                file_name,
                                bytes,
                            });
                        }
                        None => {
                            let value = field.text().await.map_err(|e| (e.status(), e.body_text()))?;
                            fields.text.push((name, value));
                        }
                    }
                }
                Ok(fields)
            }
            Some(_) => {
                let Form(text) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| (e.status(), e.body_text()))?;
                Ok(FormFields {
                    text,
                    files: Vec::new(),
                })
            }
        }
    }
}
