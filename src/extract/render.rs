//! Page generation from extracted records

use crate::extract::{extract_page_record, ExtractError, PageRecord};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders a record as a standalone HTML page
///
/// Text and attribute values are escaped.
pub fn render_page(record: &PageRecord) -> String {
    let title = encode_text(&record.title);
    let title_attr = encode_double_quoted_attribute(&record.title);

    let mut html = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<img src="{src}" alt="{title_attr}" style="max-width:300px;"/>

<h2>Movie Details:</h2>
<ul>
"#,
        src = encode_double_quoted_attribute(&record.og_image),
    );

    for (key, value) in &record.details {
        let _ = writeln!(
            html,
            "<li><strong>{}:</strong> {}</li>",
            encode_text(key),
            encode_text(value)
        );
    }
    html.push_str("</ul>\n");

    if !record.screenshots.is_empty() {
        html.push_str("<h2>Screenshots:</h2>\n");
        for src in &record.screenshots {
            let _ = writeln!(
                html,
                r#"<img src="{}" alt="screenshot" style="max-width:200px; margin:5px;">"#,
                encode_double_quoted_attribute(src)
            );
        }
    }

    if !record.downloads.is_empty() {
        html.push_str("<h2>Download Links:</h2>\n");
        for group in &record.downloads {
            let links: Vec<String> = group
                .links
                .iter()
                .map(|(text, href)| {
                    format!(
                        r#"<a href="{}" target="_blank">{}</a>"#,
                        encode_double_quoted_attribute(href),
                        encode_text(text)
                    )
                })
                .collect();
            let _ = write!(
                html,
                "<h3>{}</h3>\n<p>\n{}</p>\n",
                encode_text(&group.version),
                links.join(" | ")
            );
        }
    }

    html.push_str("</body>\n</html>");
    html
}

fn is_html_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Renders every saved page in `input` into `output`
///
/// Each `*.html` file (extension matched case-insensitively) is extracted and
/// rendered under the same file name. A file that cannot be read, extracted
/// or written is logged and skipped.
///
/// # Returns
///
/// * `Ok(usize)` - Number of pages rendered
/// * `Err(ExtractError)` - `input` could not be listed or `output` created
pub fn render_directory(input: &Path, output: &Path) -> Result<usize, ExtractError> {
    fs::create_dir_all(output)?;

    let mut paths: Vec<_> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_html_file(path))
        .collect();
    paths.sort();

    let mut rendered = 0;
    for path in paths {
        let Some(file_name) = path.file_name() else {
            continue;
        };

        match render_file(&path, &output.join(file_name)) {
            Ok(()) => {
                tracing::info!("Processed: {}", path.display());
                rendered += 1;
            }
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!("Rendered {} pages into {}", rendered, output.display());
    Ok(rendered)
}

fn render_file(source: &Path, target: &Path) -> Result<(), ExtractError> {
    let bytes = fs::read(source)?;
    let record = extract_page_record(&String::from_utf8_lossy(&bytes))?;
    fs::write(target, render_page(&record))?;
    Ok(())
}
