//! Markdown shown in hovers.

use abnf_lsp::features::HoverContent;

pub fn hover_markdown(content: &HoverContent) -> String {
    match content {
        HoverContent::CoreRule(core) => format!(
            "**{}**\n\n*Core rule (RFC 5234)*\n\n{}",
            core.name, core.description
        ),
        HoverContent::Rule {
            name,
            body,
            references,
        } => {
            let mut markdown = format!("**{name}**");
            if !body.is_empty() {
                markdown.push_str(&format!("\n\n```abnf\n{body}\n```"));
            }
            if *references > 0 {
                markdown.push_str(&format!("\n---\n\n**References**: {references}"));
            }
            markdown
        }
    }
}
