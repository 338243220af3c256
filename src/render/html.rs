use super::model::{Block, RenderModel, Severity};

fn message_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => "message ok",
        Severity::Error => "message err",
        Severity::Neutral => "message",
    }
}

/// HTML fragment for a browser surface. Every text field in the model is
/// already escaped, so it is written out verbatim.
pub fn to_html(model: &RenderModel) -> String {
    let mut out = String::new();

    for block in &model.blocks {
        match block {
            Block::Message(annotation) => {
                out.push_str(&format!(
                    "<div class=\"{}\">{}</div>\n",
                    message_class(annotation.severity),
                    annotation.text
                ));
            }
            Block::Table(table) => {
                out.push_str("<table class=\"table\">\n<thead><tr>");
                for col in &table.header {
                    out.push_str(&format!("<th>{}</th>", col));
                }
                out.push_str("</tr></thead>\n<tbody>\n");
                for row in &table.rows {
                    out.push_str("<tr>");
                    for cell in row {
                        out.push_str(&format!("<td>{}</td>", cell));
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
        }
    }

    out
}
