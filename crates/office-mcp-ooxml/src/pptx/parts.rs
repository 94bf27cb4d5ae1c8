//! Fixed PresentationML parts: theme, slide master, layouts and notes master

use office_mcp_core::presentation::{ThemePalette, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use office_mcp_core::{SlideLayout, Theme};

use crate::package::XML_DECL;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Group shape header every shape tree starts with
pub(crate) const SP_TREE_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

/// `ppt/theme/themeN.xml` for the given theme
pub(crate) fn theme_xml(theme: Theme) -> String {
    let ThemePalette {
        dark,
        light,
        accents,
        major_font,
        minor_font,
    } = theme.palette();

    let mut accent_xml = String::new();
    for (i, color) in accents.iter().enumerate() {
        accent_xml.push_str(&format!(
            r#"<a:accent{n}><a:srgbClr val="{hex}"/></a:accent{n}>"#,
            n = i + 1,
            hex = color.to_hex()
        ));
    }

    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = |w: u32| {
        format!(r#"<a:ln w="{w}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#)
    };

    format!(
        r#"{XML_DECL}
<a:theme xmlns:a="{NS_A}" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="{dark}"/></a:dk2><a:lt2><a:srgbClr val="{light}"/></a:lt2>{accent_xml}<a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="{major_font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{minor_font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="{name}"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{l1}{l2}{l3}</a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        name = theme.name(),
        dark = dark.to_hex(),
        light = light.to_hex(),
        l1 = line(6350),
        l2 = line(12700),
        l3 = line(19050),
    )
}

/// `ppt/slideMasters/slideMaster1.xml`; layouts take rId1..=9 in [`SlideLayout::ALL`] order
pub(crate) fn slide_master_xml() -> String {
    let mut layout_ids = String::new();
    for (i, _) in SlideLayout::ALL.iter().enumerate() {
        layout_ids.push_str(&format!(
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2_147_483_649u64 + i as u64,
            i + 1
        ));
    }
    format!(
        r#"{XML_DECL}
<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{SP_TREE_HEADER}</p:spTree></p:cSld>{CLR_MAP}<p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="2800"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#
    )
}

/// `ppt/slideLayouts/slideLayoutN.xml`
pub(crate) fn slide_layout_xml(layout: SlideLayout) -> String {
    format!(
        r#"{XML_DECL}
<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="{kind}" preserve="1"><p:cSld name="{name}"><p:spTree>{SP_TREE_HEADER}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        kind = layout.ooxml_type(),
        name = layout.name(),
    )
}

/// `ppt/notesMasters/notesMaster1.xml`
pub(crate) fn notes_master_xml() -> String {
    format!(
        r#"{XML_DECL}
<p:notesMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{SP_TREE_HEADER}</p:spTree></p:cSld>{CLR_MAP}</p:notesMaster>"#
    )
}

/// Slide size element for `presentation.xml`
pub(crate) fn slide_size_xml() -> String {
    format!(
        r#"<p:sldSz cx="{SLIDE_WIDTH_EMU}" cy="{SLIDE_HEIGHT_EMU}" type="screen4x3"/><p:notesSz cx="{SLIDE_HEIGHT_EMU}" cy="{SLIDE_WIDTH_EMU}"/>"#
    )
}

/// Geometry of a placeholder on a given layout: (x, y, cx, cy) in EMU
pub(crate) fn placeholder_frame(
    layout: SlideLayout,
    placeholder: office_mcp_core::Placeholder,
) -> (i64, i64, i64, i64) {
    use office_mcp_core::Placeholder;
    match (layout, placeholder) {
        (SlideLayout::TitleSlide, Placeholder::Title) => (685_800, 2_130_425, 7_772_400, 1_470_025),
        (SlideLayout::TitleSlide, Placeholder::Subtitle) => {
            (1_371_600, 3_886_200, 6_400_800, 1_752_600)
        }
        (SlideLayout::SectionHeader, Placeholder::Title) => {
            (722_313, 4_406_900, 7_772_400, 1_362_075)
        }
        (SlideLayout::SectionHeader, _) => (722_313, 2_906_713, 7_772_400, 1_500_187),
        (_, Placeholder::Title) => (457_200, 274_638, 8_229_600, 1_143_000),
        (_, Placeholder::Subtitle) => (457_200, 1_417_638, 8_229_600, 609_600),
        (_, Placeholder::Content) => (457_200, 1_600_200, 8_229_600, 4_525_963),
    }
}
