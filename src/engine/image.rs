use crate::content::escape_attr;

pub(crate) const IMAGE_STYLE: &str =
    "max-width: 100%; height: auto; display: block; border-radius: 4px; margin: 4px 0;";

const URL_ALT: &str = "Inserted image";

/// The two ways an image can reach a note.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ImageSource {
    Url(String),
    /// A local file already read into a `data:` URL.
    Payload { name: String, data_url: String },
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NormalizedImage {
    pub src: String,
    pub alt: String,
}

impl NormalizedImage {
    /// `None` for a blank URL.
    pub fn from_source(source: &ImageSource) -> Option<Self> {
        match source {
            ImageSource::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return None;
                }
                Some(Self {
                    src: url.to_string(),
                    alt: URL_ALT.to_string(),
                })
            }
            ImageSource::Payload { name, data_url } => Some(Self {
                src: data_url.clone(),
                alt: if name.is_empty() {
                    URL_ALT.to_string()
                } else {
                    name.clone()
                },
            }),
        }
    }

    /// Image element followed by the trailing line break.
    pub fn markup(&self) -> String {
        format!(
            r#"<img src="{}" alt="{}" style="{}"><br>"#,
            escape_attr(&self.src),
            escape_attr(&self.alt),
            IMAGE_STYLE
        )
    }
}
