//! DrawingML chart and drawing parts for worksheet charts

use office_mcp_core::{CellAddress, CellRange, Chart, ChartType};

use crate::error::OoxmlResult;
use crate::package::{xml_text, XML_DECL};

const NS_C: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_XDR: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

const CAT_AX_ID: u32 = 500_000_001;
const VAL_AX_ID: u32 = 500_000_002;

/// Quote a sheet name for use in a formula reference
fn sheet_ref(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

fn range_ref(sheet: &str, range: CellRange) -> String {
    format!(
        "{}!{}:{}",
        sheet_ref(sheet),
        range.start.to_absolute_string(),
        range.end.to_absolute_string()
    )
}

fn cell_ref(sheet: &str, cell: CellAddress) -> String {
    format!("{}!{}", sheet_ref(sheet), cell.to_absolute_string())
}

/// `xl/charts/chartN.xml` for a chart on `sheet`
pub(crate) fn chart_xml(sheet: &str, chart: &Chart) -> OoxmlResult<String> {
    let mut series = String::new();
    for (i, source) in chart.series().iter().enumerate() {
        series.push_str(&format!(r#"<c:ser><c:idx val="{i}"/><c:order val="{i}"/>"#));
        if let Some(name) = source.name {
            series.push_str(&format!(
                "<c:tx><c:strRef><c:f>{}</c:f></c:strRef></c:tx>",
                xml_text(&cell_ref(sheet, name))?
            ));
        }
        if chart.chart_type == ChartType::Line {
            series.push_str(r#"<c:marker><c:symbol val="none"/></c:marker>"#);
        }
        if let Some(categories) = source.categories {
            series.push_str(&format!(
                "<c:cat><c:strRef><c:f>{}</c:f></c:strRef></c:cat>",
                xml_text(&range_ref(sheet, categories))?
            ));
        }
        series.push_str(&format!(
            "<c:val><c:numRef><c:f>{}</c:f></c:numRef></c:val>",
            xml_text(&range_ref(sheet, source.values))?
        ));
        if chart.chart_type == ChartType::Line {
            series.push_str(r#"<c:smooth val="0"/>"#);
        }
        series.push_str("</c:ser>");
    }

    let axis_ids = format!(r#"<c:axId val="{CAT_AX_ID}"/><c:axId val="{VAL_AX_ID}"/>"#);
    let plot = match chart.chart_type {
        ChartType::Bar | ChartType::Column => {
            let dir = if chart.chart_type == ChartType::Bar {
                "bar"
            } else {
                "col"
            };
            format!(
                r#"<c:barChart><c:barDir val="{dir}"/><c:grouping val="clustered"/><c:varyColors val="0"/>{series}<c:gapWidth val="150"/>{axis_ids}</c:barChart>"#
            )
        }
        ChartType::Line => format!(
            r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>{series}<c:marker val="1"/>{axis_ids}</c:lineChart>"#
        ),
        ChartType::Pie => format!(
            r#"<c:pieChart><c:varyColors val="1"/>{series}<c:firstSliceAng val="0"/></c:pieChart>"#
        ),
    };

    let axes = if chart.chart_type == ChartType::Pie {
        String::new()
    } else {
        let (cat_pos, val_pos) = if chart.chart_type == ChartType::Bar {
            ("l", "b")
        } else {
            ("b", "l")
        };
        format!(
            r#"<c:catAx><c:axId val="{CAT_AX_ID}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="{cat_pos}"/><c:numFmt formatCode="General" sourceLinked="1"/><c:tickLblPos val="nextTo"/><c:crossAx val="{VAL_AX_ID}"/><c:crosses val="autoZero"/><c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/></c:catAx><c:valAx><c:axId val="{VAL_AX_ID}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="{val_pos}"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="1"/><c:tickLblPos val="nextTo"/><c:crossAx val="{CAT_AX_ID}"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#
        )
    };

    let title = match &chart.title {
        Some(title) => format!(
            r#"<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title><c:autoTitleDeleted val="0"/>"#,
            xml_text(title)?
        ),
        None => r#"<c:autoTitleDeleted val="1"/>"#.to_string(),
    };

    Ok(format!(
        r#"{XML_DECL}
<c:chartSpace xmlns:c="{NS_C}" xmlns:a="{NS_A}" xmlns:r="{NS_R}"><c:roundedCorners val="0"/><c:chart>{title}<c:plotArea><c:layout/>{plot}{axes}</c:plotArea><c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend><c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart></c:chartSpace>"#
    ))
}

/// `xl/drawings/drawingN.xml`; chart `i` on the sheet uses relationship `rId{i+1}`
pub(crate) fn drawing_xml(charts: &[Chart]) -> String {
    let mut anchors = String::new();
    for (i, chart) in charts.iter().enumerate() {
        let a = chart.anchor;
        anchors.push_str(&format!(
            r#"<xdr:twoCellAnchor editAs="oneCell"><xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:graphicFrame macro=""><xdr:nvGraphicFramePr><xdr:cNvPr id="{}" name="Chart {}"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr><xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm><a:graphic><a:graphicData uri="{NS_C}"><c:chart xmlns:c="{NS_C}" r:id="rId{}"/></a:graphicData></a:graphic></xdr:graphicFrame><xdr:clientData/></xdr:twoCellAnchor>"#,
            a.from_col,
            a.from_row,
            a.to_col,
            a.to_row,
            i + 2,
            i + 1,
            i + 1,
        ));
    }
    format!(
        r#"{XML_DECL}
<xdr:wsDr xmlns:xdr="{NS_XDR}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">{anchors}</xdr:wsDr>"#
    )
}
