//! HTML pages for the upload form flow.

use std::fmt::Write;

use super::dto::PlotLinkDto;
use crate::models::Distance;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The upload form served at `/`.
pub fn upload_form(max_upload_bytes: usize, default_distance: u32) -> String {
    let mut options = String::new();
    for distance in Distance::ALL {
        let meters = distance.meters();
        let selected = if meters == default_distance { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{meters}"{selected}>{meters} m</option>"#);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Shot Marker</title></head>
<body>
<h1>Shot Marker</h1>
<form action="/upload" method="post" enctype="multipart/form-data">
  <p><label>CSV file (max {max_kb} KB): <input type="file" name="file" accept=".csv" required></label></p>
  <p><label>Distance: <select name="distance">{options}</select></label></p>
  <p><label>X offset (mm): <input type="number" name="x_offset" value="0"></label></p>
  <p><label>Y offset (mm): <input type="number" name="y_offset" value="0"></label></p>
  <p><button type="submit">Generate plots</button></p>
</form>
</body>
</html>
"#,
        max_kb = max_upload_bytes / 1024,
    )
}

/// Results page embedding each generated diagram.
pub fn results_page(distance: u32, plots: &[PlotLinkDto], failures: &[String]) -> String {
    let mut body = String::new();
    for plot in plots {
        let _ = write!(
            body,
            r#"<section><h2>{position} ({score})</h2><img src="{url}" alt="{position} group" width="800"><p><a href="{url}" download>Download</a></p></section>"#,
            position = plot.position,
            score = escape_html(&plot.score),
            url = escape_html(&plot.url),
        );
    }
    for failure in failures {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape_html(failure));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Shot Marker - {distance}m</title></head>
<body>
<h1>Results - {distance}m</h1>
{body}
<p><a href="/">Upload another file</a></p>
</body>
</html>
"#
    )
}
