// crates/marker_block_parser/tests/integration_css.rs

use std::fs;
use marker_block_parser::{parse_blocks, MarkerParser, UnterminatedBlock};
use snippet_marker::MarkerPair;
use tempfile::tempdir;

/// A theme file with three annotated regions and unrelated rules around them.
const THEME_CSS: &str = r#"/* Theme: Example */
:root { --accent: #7f6df2; }

/* obsi-snip-coll start */
.markdown-rendered h1 {
    color: var(--accent);
}
/* obsi-snip-coll end */

.nav-file-title { padding: 2px; }

    /* obsi-snip-coll start */
body { font-size: 1.2rem; }
    /* obsi-snip-coll end */

/* obsi-snip-coll start */
.callout { border-radius: 8px; }

.callout-title { font-weight: 600; }
/* obsi-snip-coll end */
"#;

#[test]
fn test_theme_file_yields_blocks_in_source_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("theme.css");
    fs::write(&path, THEME_CSS).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let blocks = parse_blocks(&text, &MarkerPair::default()).unwrap();

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[0].text(),
        ".markdown-rendered h1 {\n    color: var(--accent);\n}"
    );
    assert_eq!(blocks[1].text(), "body { font-size: 1.2rem; }");
    assert_eq!(
        blocks[2].text(),
        ".callout { border-radius: 8px; }\n\n.callout-title { font-weight: 600; }"
    );
    assert_eq!((blocks[0].start_line, blocks[0].end_line), (4, 8));
    assert_eq!((blocks[1].start_line, blocks[1].end_line), (12, 14));
    assert_eq!((blocks[2].start_line, blocks[2].end_line), (16, 20));
    assert!(blocks.windows(2).all(|w| w[0].end_line < w[1].start_line));
}

#[test]
fn test_block_count_matches_marker_pairs() {
    let markers = MarkerPair::default();
    for n in 0..6 {
        let mut text = String::from("/* header */\n");
        for i in 0..n {
            text.push_str(&format!(
                "{}\n.rule-{} {{ margin: {}px; }}\n{}\nbetween\n",
                markers.start(),
                i,
                i,
                markers.end()
            ));
        }
        let blocks = parse_blocks(&text, &markers).unwrap();
        assert_eq!(blocks.len(), n);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.text(), format!(".rule-{} {{ margin: {}px; }}", i, i));
        }
    }
}

#[test]
fn test_custom_markers_ignore_default_ones() {
    let markers = MarkerPair::new("/* @snippet */", "/* @end */").unwrap();
    let text = "\
/* obsi-snip-coll start */
.ignored { }
/* obsi-snip-coll end */
/* @snippet */
.taken { }
/* @end */";
    let blocks = MarkerParser::new(text, &markers).parse_all().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].content, vec![".taken { }"]);
}

#[test]
fn test_unterminated_block_emits_nothing() {
    let text = "\
/* obsi-snip-coll start */
.first { }
/* obsi-snip-coll end */
/* obsi-snip-coll start */
.never-closed { }
";
    let result = parse_blocks(text, &MarkerPair::default());
    assert_eq!(result, Err(UnterminatedBlock { start_line: 4 }));
}
