//! `word/styles.xml` and `word/numbering.xml`

use super::NS_W;
use crate::package::XML_DECL;

/// Paragraph styles every generated document defines: (id, name, run properties, paragraph properties)
const PARAGRAPH_STYLES: &[(&str, &str, &str, &str)] = &[
    ("Title", "Title", r#"<w:sz w:val="56"/>"#, r#"<w:spacing w:after="120"/>"#),
    ("Subtitle", "Subtitle", r#"<w:i/><w:color w:val="5A5A5A"/><w:sz w:val="30"/>"#, ""),
    ("Heading1", "heading 1", r#"<w:b/><w:color w:val="2F5496"/><w:sz w:val="32"/>"#, r#"<w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="0"/>"#),
    ("Heading2", "heading 2", r#"<w:b/><w:color w:val="2F5496"/><w:sz w:val="26"/>"#, r#"<w:keepNext/><w:spacing w:before="40"/><w:outlineLvl w:val="1"/>"#),
    ("Heading3", "heading 3", r#"<w:b/><w:color w:val="1F3763"/><w:sz w:val="24"/>"#, r#"<w:keepNext/><w:spacing w:before="40"/><w:outlineLvl w:val="2"/>"#),
    ("Heading4", "heading 4", r#"<w:b/><w:i/><w:color w:val="2F5496"/>"#, r#"<w:keepNext/><w:outlineLvl w:val="3"/>"#),
    ("Heading5", "heading 5", r#"<w:color w:val="2F5496"/>"#, r#"<w:keepNext/><w:outlineLvl w:val="4"/>"#),
    ("Heading6", "heading 6", r#"<w:color w:val="1F3763"/>"#, r#"<w:keepNext/><w:outlineLvl w:val="5"/>"#),
    ("Quote", "Quote", r#"<w:i/><w:color w:val="404040"/>"#, r#"<w:ind w:left="864" w:right="864"/><w:jc w:val="center"/>"#),
    ("IntenseQuote", "Intense Quote", r#"<w:i/><w:color w:val="4472C4"/>"#, r#"<w:ind w:left="864" w:right="864"/><w:jc w:val="center"/>"#),
    ("ListParagraph", "List Paragraph", "", r#"<w:ind w:left="720"/>"#),
    ("ListBullet", "List Bullet", "", r#"<w:ind w:left="720" w:hanging="360"/>"#),
    ("ListNumber", "List Number", "", r#"<w:ind w:left="720" w:hanging="360"/>"#),
    ("Caption", "caption", r#"<w:i/><w:color w:val="44546A"/><w:sz w:val="18"/>"#, ""),
    ("NoSpacing", "No Spacing", "", r#"<w:spacing w:after="0" w:line="240" w:lineRule="auto"/>"#),
];

pub(crate) fn styles_xml() -> String {
    let mut styles = String::new();
    for (id, name, r_pr, p_pr) in PARAGRAPH_STYLES {
        styles.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#
        ));
        if !p_pr.is_empty() {
            styles.push_str(&format!("<w:pPr>{p_pr}</w:pPr>"));
        }
        if !r_pr.is_empty() {
            styles.push_str(&format!("<w:rPr>{r_pr}</w:rPr>"));
        }
        styles.push_str("</w:style>");
    }

    format!(
        r#"{XML_DECL}
<w:styles xmlns:w="{NS_W}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>{styles}<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#
    )
}

/// Bullets use abstract definition 0 through num 1; every numbered list gets
/// its own num (2, 3, ...) over abstract definition 1 so each starts at 1.
pub(crate) fn numbering_xml(numbered_lists: usize) -> String {
    let mut nums = String::from(r#"<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#);
    for i in 0..numbered_lists {
        nums.push_str(&format!(
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="1"/><w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride></w:num>"#,
            i + 2
        ));
    }

    format!(
        r#"{XML_DECL}
<w:numbering xmlns:w="{NS_W}"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>{nums}</w:numbering>"#
    )
}
