//! Rendering a [`GalleryPage`] as HTML or plain text.
//!
//! The HTML page is self-contained: a search form (text box plus category
//! and tag dropdowns), the quick-filter row with unfiltered counts, the
//! card grid, and at most one notice. Every interpolated string is
//! escaped; filter values in links are percent-encoded.

use gallery_core::filter::{Filter, Selection, ALL};
use gallery_core::view::{GalleryPage, Notice, Phase};
use std::fmt::Write;

use crate::config::GalleryConfig;

/// Label shown for a blank category or tag value.
const BLANK_LABEL: &str = "(none)";

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0 auto;max-width:72rem;padding:2rem 1rem;color:#111}\
header p{color:#555;font-size:1.1rem}\
form{display:flex;flex-wrap:wrap;gap:1rem;margin:1.5rem 0}\
form input[type=text]{flex:1 1 16rem;padding:.5rem}\
form select{flex:1 1 12rem;padding:.5rem}\
nav.quick{display:flex;flex-wrap:wrap;gap:.75rem;margin-bottom:2rem}\
nav.quick a{background:#e5e7eb;border-radius:999px;padding:.5rem 1rem;text-decoration:none;color:#111;font-size:.9rem}\
nav.quick a.active{background:#111;color:#fff}\
nav.quick span{color:#6b7280;margin-left:.25rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.card{border:1px solid #e5e7eb;border-radius:.5rem;overflow:hidden}\
.card img{width:100%;height:12rem;object-fit:cover;background:#f3f4f6}\
.card .body{padding:1rem}\
.badge{display:inline-block;border:1px solid #d1d5db;border-radius:999px;padding:.1rem .6rem;margin:.2rem .2rem 0 0;font-size:.8rem}\
.badge.category{background:#f3f4f6}\
.notice{text-align:center;color:#6b7280;margin-top:2rem}\
.notice.failed{color:#b91c1c}";

/// Render the full HTML document.
pub fn render_html(page: &GalleryPage, gallery: &GalleryConfig) -> String {
    let mut out = String::with_capacity(4096 + page.cards.len() * 512);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&gallery.title),
        STYLE
    );

    let _ = write!(
        out,
        "<header>\n<h1>{}</h1>\n<p>{}</p>\n</header>\n",
        escape_html(&gallery.title),
        escape_html(&gallery.tagline)
    );

    render_form(&mut out, page);
    render_quick_filters(&mut out, page);

    if !page.cards.is_empty() {
        out.push_str("<main class=\"grid\">\n");
        for card in &page.cards {
            let _ = write!(
                out,
                "<article class=\"card\" id=\"app-{}\">\n<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
                 <div class=\"body\">\n<h2>{}</h2>\n<p>{}</p>\n<div class=\"badges\">\
                 <span class=\"badge category\">{}</span>",
                escape_html(&card.id),
                escape_html(&card.image),
                escape_html(&card.title),
                escape_html(&card.title),
                escape_html(&card.description),
                escape_html(&card.category)
            );
            for tag in &card.tags {
                let _ = write!(out, "<span class=\"badge\">{}</span>", escape_html(tag));
            }
            out.push_str("</div>\n</div>\n</article>\n");
        }
        out.push_str("</main>\n");
    }

    if let Some(notice) = &page.notice {
        let class = match notice {
            Notice::LoadFailed { .. } => "notice failed",
            _ => "notice",
        };
        let _ = write!(
            out,
            "<p class=\"{}\" role=\"status\">{}</p>\n",
            class,
            escape_html(notice.message())
        );
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_form(out: &mut String, page: &GalleryPage) {
    out.push_str("<form method=\"get\" action=\"/\">\n");
    let _ = write!(
        out,
        "<input type=\"text\" name=\"q\" placeholder=\"Search apps...\" value=\"{}\">\n",
        escape_html(&page.filter.query)
    );
    render_select(out, "category", "All Categories", &page.categories, &page.filter.category);
    render_select(out, "tag", "All Tags", &page.tags, &page.filter.tag);
    out.push_str("<button type=\"submit\">Filter</button>\n</form>\n");
}

fn render_select(
    out: &mut String,
    name: &str,
    all_label: &str,
    options: &[String],
    selected: &Selection,
) {
    let _ = write!(out, "<select name=\"{}\">\n", name);
    let _ = write!(
        out,
        "<option value=\"{}\"{}>{}</option>\n",
        ALL,
        if selected.is_all() { " selected" } else { "" },
        all_label
    );
    for option in options {
        let is_selected = !selected.is_all() && selected.as_value() == option;
        render_option(out, option, is_selected);
    }
    // A value from the query string that no record carries still has to
    // show as the active choice.
    if let Selection::Only(value) = selected {
        if !options.contains(value) {
            render_option(out, value, true);
        }
    }
    out.push_str("</select>\n");
}

fn render_option(out: &mut String, value: &str, selected: bool) {
    let _ = write!(
        out,
        "<option value=\"{}\"{}>{}</option>\n",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(display_label(value))
    );
}

fn display_label(value: &str) -> &str {
    if value.trim().is_empty() {
        BLANK_LABEL
    } else {
        value
    }
}

fn render_quick_filters(out: &mut String, page: &GalleryPage) {
    if page.quick_filters.is_empty() {
        return;
    }
    out.push_str("<nav class=\"quick\">\n");
    for qf in &page.quick_filters {
        let target = Filter {
            category: Selection::Only(qf.category.clone()),
            ..page.filter.clone()
        };
        let _ = write!(
            out,
            "<a href=\"{}\"{}>{}<span>{}</span></a>\n",
            escape_html(&filter_href(&target)),
            if qf.active { " class=\"active\"" } else { "" },
            escape_html(display_label(&qf.category)),
            qf.count
        );
    }
    out.push_str("</nav>\n");
}

/// Plain-text rendering for the CLI.
pub fn render_text(page: &GalleryPage) -> String {
    let mut out = String::new();

    if page.phase == Phase::Loaded {
        let _ = writeln!(out, "{} of {} apps", page.cards.len(), page.total);
    }

    for card in &page.cards {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}  [{}]", card.title, card.category);
        let _ = writeln!(out, "  id: {}", card.id);
        if !card.description.is_empty() {
            let _ = writeln!(out, "  {}", card.description);
        }
        if !card.image.is_empty() {
            let _ = writeln!(out, "  image: {}", card.image);
        }
        if !card.tags.is_empty() {
            let _ = writeln!(out, "  tags: {}", card.tags.join(", "));
        }
    }

    if let Some(notice) = &page.notice {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", notice.message());
    }

    out
}

/// Relative link reproducing `filter`; default values are omitted.
pub fn filter_href(filter: &Filter) -> String {
    let mut params = Vec::new();
    if !filter.query.is_empty() {
        params.push(format!("q={}", encode_component(&filter.query)));
    }
    if !filter.category.is_all() {
        params.push(format!("category={}", encode_component(filter.category.as_value())));
    }
    if !filter.tag.is_all() {
        params.push(format!("tag={}", encode_component(filter.tag.as_value())));
    }
    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                let _ = write!(result, "%{:02X}", byte);
            }
        }
    }
    result
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
