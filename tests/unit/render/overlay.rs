use super::*;

fn spec(name: &str, flavor: &str) -> CardSpec {
    CardSpec {
        id: "c1".into(),
        mechanic_id: "VANILLA".into(),
        name: name.into(),
        flavor_text: flavor.into(),
        image_prompt: None,
        count: 1,
    }
}

#[test]
fn title_is_uppercased_and_escaped() {
    let svg = overlay_svg(&spec("R&D <Budget>", ""), "Bebas Neue", "Bebas Neue");
    assert!(svg.contains(">R&amp;D &lt;BUDGET&gt;</text>"), "{svg}");
    assert!(svg.contains(r#"y="126""#));
    assert!(svg.contains("font-family=\"'Bebas Neue'\""));
}

#[test]
fn backdrop_renders_for_empty_flavor() {
    let svg = overlay_svg(&spec("Lost Deal", ""), "A", "B");
    assert!(svg.contains(r#"<rect x="100" y="750" width="550" height="200" rx="20""#));
    assert!(!svg.contains("<tspan"));
}

#[test]
fn flavor_lines_become_centered_tspans() {
    let svg = overlay_svg(&spec("x", "Circle back offline."), "A", "Body Face");
    assert!(svg.contains("font-family=\"'Body Face', sans-serif\""));
    assert!(svg.contains(r#"<tspan x="375" y="859">Circle back offline.</tspan>"#), "{svg}");
}

#[test]
fn overlay_parses_as_svg() {
    let svg = overlay_svg(&spec("Quote \"Unquote\"", "it's <fine> & dandy"), "A", "B");
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn wrap_flavor_breaks_on_words() {
    let text = "Let us take this offline and circle back after we align on the deliverables";
    let lines = wrap_flavor(text);
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| l.chars().count() <= 33));
    assert_eq!(lines.join(" "), text);
}

#[test]
fn wrap_flavor_truncates_with_ellipsis() {
    let text = "word ".repeat(200);
    let lines = wrap_flavor(&text);
    assert_eq!(lines.len(), 4);
    assert!(lines[3].ends_with('\u{2026}'));
}

#[test]
fn wrap_flavor_splits_long_words_and_ignores_blank() {
    let lines = wrap_flavor(&"x".repeat(40));
    assert_eq!(lines, vec!["x".repeat(33), "x".repeat(7)]);
    assert!(wrap_flavor("   ").is_empty());
}

#[test]
fn escape_xml_drops_characters_xml_cannot_carry() {
    assert_eq!(escape_xml("Bad\u{1}Name\u{1F}"), "BadName");
    assert_eq!(escape_xml("a\u{FFFE}b\u{FFFF}c"), "abc");
    assert_eq!(escape_xml("tab\tline\ncr\r"), "tab\tline\ncr\r");
    assert_eq!(escape_xml("caf\u{E9} \u{1F0CF}"), "caf\u{E9} \u{1F0CF}");
}

#[test]
fn overlay_with_control_characters_still_parses() {
    let svg = overlay_svg(&spec("Bad\u{1}Name", "line\u{8}feed\u{0}"), "A\u{2}", "B");
    assert!(svg.contains(">BADNAME</text>"), "{svg}");
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}
