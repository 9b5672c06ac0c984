//! Content-type classification for file iconography and drag hints.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Icon id and descriptive phrase for a known content type.
pub struct MimeInfo {
    /// Icon class, including the `icon-` prefix.
    pub icon: &'static str,
    /// Human description shown while dragging.
    pub hint: &'static str,
}

/// Icon used for content types missing from the table.
pub const GENERIC_FILE_ICON: &str = "icon-file";

const fn info(icon: &'static str, hint: &'static str) -> MimeInfo {
    MimeInfo { icon, hint }
}

const MIME_TABLE: &[(&str, MimeInfo)] = &[
    ("application/pdf", info("icon-file-type", "PDF document")),
    ("application/msword", info("icon-file-word", "Microsoft Word document")),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        info("icon-file-word", "Microsoft Word document"),
    ),
    (
        "application/vnd.ms-excel",
        info("icon-file-spreadsheet", "Microsoft Excel spreadsheet"),
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        info("icon-file-spreadsheet", "Microsoft Excel spreadsheet"),
    ),
    (
        "application/vnd.ms-powerpoint",
        info("icon-file-video", "Microsoft PowerPoint presentation"),
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        info("icon-file-video", "Microsoft PowerPoint presentation"),
    ),
    ("application/zip", info("icon-file-archive", "ZIP archive")),
    ("application/x-tar", info("icon-file-archive", "TAR archive")),
    ("application/x-gzip", info("icon-file-archive", "GZIP archive")),
    ("application/x-bzip2", info("icon-file-archive", "BZIP2 archive")),
    ("application/x-diskcopy", info("icon-file-archive", "Disk Copy archive")),
    ("application/x-7z-compressed", info("icon-file-archive", "7-Zip archive")),
    ("application/x-rar-compressed", info("icon-file-archive", "RAR archive")),
    ("application/x-xz", info("icon-file-archive", "XZ archive")),
    ("application/x-zip-compressed", info("icon-file-archive", "ZIP archive")),
    ("text/plain", info("icon-file-text", "Text file")),
    ("text/html", info("icon-file-code", "HTML document")),
    ("text/css", info("icon-file-code", "CSS stylesheet")),
    ("text/javascript", info("icon-file-code", "JavaScript file")),
    ("application/json", info("icon-file-json", "JSON document")),
    ("application/xml", info("icon-file-code", "XML document")),
    ("application/ld+json", info("icon-file-json", "JSON-LD document")),
    ("audio/mpeg", info("icon-file-audio", "MP3 audio")),
    ("audio/ogg", info("icon-file-audio", "OGG audio")),
    ("audio/wav", info("icon-file-audio", "WAV audio")),
    ("audio/webm", info("icon-file-audio", "WebM audio")),
    ("audio/flac", info("icon-file-audio", "FLAC audio")),
    ("audio/aac", info("icon-file-audio", "AAC audio")),
    ("image/gif", info("icon-file-image", "GIF image")),
    ("image/jpeg", info("icon-file-image", "JPEG image")),
    ("image/png", info("icon-file-image", "PNG image")),
    ("image/webp", info("icon-file-image", "WebP image")),
    ("image/svg+xml", info("icon-file-image", "SVG image")),
    ("video/mp4", info("icon-file-video-2", "MP4 video")),
    ("video/ogg", info("icon-file-video-2", "OGG video")),
    ("video/webm", info("icon-file-video-2", "WebM video")),
    ("video/x-matroska", info("icon-file-video-2", "Matroska video")),
    ("video/quicktime", info("icon-file-video-2", "QuickTime video")),
    ("video/x-msvideo", info("icon-file-video-2", "AVI video")),
    ("video/x-ms-wmv", info("icon-file-video-2", "Windows Media Video")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of classifying a content type.
pub struct Classification {
    /// Icon class; [`GENERIC_FILE_ICON`] for unknown types.
    pub icon: &'static str,
    /// Descriptive phrase, when the type is known.
    pub hint: Option<&'static str>,
}

/// Looks up table metadata for `content_type`, ignoring case and parameters.
pub fn mime_info(content_type: &str) -> Option<MimeInfo> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == essence)
        .map(|(_, info)| *info)
}

/// Classifies `content_type`. Unknown or empty types get the generic icon and no hint.
pub fn classify(content_type: &str) -> Classification {
    match mime_info(content_type) {
        Some(info) => Classification {
            icon: info.icon,
            hint: Some(info.hint),
        },
        None => Classification {
            icon: GENERIC_FILE_ICON,
            hint: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn known_types_map_to_icon_and_hint() {
        assert_eq!(
            classify("application/pdf"),
            Classification {
                icon: "icon-file-type",
                hint: Some("PDF document"),
            }
        );
        assert_eq!(classify("video/webm").icon, "icon-file-video-2");
    }

    #[test]
    fn parameters_and_case_are_ignored() {
        assert_eq!(classify("Text/Plain; charset=utf-8").hint, Some("Text file"));
    }

    #[test]
    fn unknown_types_fall_back_to_generic_file() {
        for content_type in ["", "application/octet-stream", "chemical/x-pdb"] {
            assert_eq!(
                classify(content_type),
                Classification {
                    icon: GENERIC_FILE_ICON,
                    hint: None,
                }
            );
        }
    }
}
