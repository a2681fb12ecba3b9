// src/render.rs
use crate::models::ArticleViewModel;

pub fn render_article_text(vm: &ArticleViewModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", vm.title.trim()));
    out.push_str(&format!("[{}]\n", vm.category));

    if let Some(img) = &vm.image {
        out.push_str(&format!("Image: {} ({})\n", img.url, img.position));
    }

    for p in vm.paragraphs() {
        out.push_str(&format!("\n{}\n", p));
    }

    if !vm.related_articles.is_empty() {
        out.push_str("\nRelated:\n");
        for a in &vm.related_articles {
            out.push_str(&format!("- [{}] {} → {}\n", a.relation, a.title, a.extract));
        }
    }

    out
}

/// The only text handed to speech playback.
pub fn speech_text(vm: &ArticleViewModel) -> &str {
    vm.definition.trim()
}
