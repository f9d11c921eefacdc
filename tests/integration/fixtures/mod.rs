// Test fixtures with known markup documents and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

/// Short paragraph using every quote style plus a dash and an ellipsis
pub const QUOTED_HTML: &str = "<p>\u{201C}Hello\u{201D} \u{2014} \u{2018}world\u{2019}\u{2026}</p>\n";

/// QUOTED_HTML after replace mode with the default table
pub const QUOTED_REPLACED: &str = "<p>\"Hello\" - 'world'...</p>\n";

/// QUOTED_HTML after escape mode
pub const QUOTED_ESCAPED: &str = "<p>&#8220;Hello&#8221; &#8212; &#8216;world&#8217;&#8230;</p>\n";

/// Multi-line recipe with fractions and all four dash variants
pub const RECIPE_XML: &str = "<recipe>
  <item>\u{00BD} cup flour</item>
  <item>\u{00BC}\u{2012}\u{00BE} cup sugar</item>
  <note>Bake 20\u{2013}25 minutes \u{2015} or until golden\u{2014}done.</note>
</recipe>
";

/// Problem report for RECIPE_XML, with the path prefix stripped
pub const RECIPE_PROBLEMS: &str = "2:9 U+00BD '\u{00BD}'
3:9 U+00BC '\u{00BC}'
3:10 U+2012 '\u{2012}'
3:11 U+00BE '\u{00BE}'
4:16 U+2013 '\u{2013}'
4:28 U+2015 '\u{2015}'
4:45 U+2014 '\u{2014}'";

/// RECIPE_XML after replace mode
pub const RECIPE_REPLACED: &str = "<recipe>
  <item>1/2 cup flour</item>
  <item>1/4-3/4 cup sugar</item>
  <note>Bake 20-25 minutes - or until golden-done.</note>
</recipe>
";

/// Document with no problem characters at all
pub const CLEAN_HTML: &str = "<p>\"Plain\" ASCII - nothing to fix...</p>";
