//! Document format detection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentFormat::Pdf,
            "txt" => DocumentFormat::Text,
            "md" | "markdown" => DocumentFormat::Markdown,
            _ => DocumentFormat::Unknown,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Text => write!(f, "text"),
            DocumentFormat::Markdown => write!(f, "markdown"),
            DocumentFormat::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(DocumentFormat::from_extension("PDF"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension("md"), DocumentFormat::Markdown);
        assert_eq!(DocumentFormat::from_extension("markdown"), DocumentFormat::Markdown);
        assert_eq!(DocumentFormat::from_extension("txt"), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_extension("docx"), DocumentFormat::Unknown);
    }
}
