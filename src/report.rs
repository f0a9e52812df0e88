use crate::error::Result;
use crate::types::{FilterSelection, Flow, RankingTable};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Row holding the `Region` metadata entry; `Period` follows on the next row.
pub const METADATA_ROW: u32 = 0;
/// Header row of the ranking table. Rows 2..=4 stay blank.
pub const TABLE_HEADER_ROW: u32 = 5;
pub const TABLE_HEADERS: [&str; 4] = ["#", "Product", "Value (US$)", "Percent (%)"];

/// Everything the workbook needs: both rankings and the selection they came from.
pub struct ReportInput<'a> {
    pub region: &'a str,
    pub period: String,
    pub exports: &'a RankingTable,
    pub imports: &'a RankingTable,
}

impl<'a> ReportInput<'a> {
    pub fn new(selection: &'a FilterSelection, exports: &'a RankingTable, imports: &'a RankingTable) -> Self {
        Self {
            region: &selection.region,
            period: selection.period_description(),
            exports,
            imports,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.exports.is_empty() || !self.imports.is_empty()
    }

    pub fn file_name(&self) -> String {
        report_file_name(self.region, &self.period)
    }
}

/// `Relatorio_Comex_<region>_<period>.xlsx`, spaces in the region replaced.
pub fn report_file_name(region: &str, period: &str) -> String {
    format!("Relatorio_Comex_{}_{}.xlsx", region.replace(' ', "_"), period)
}

/// Two-sheet xlsx writer. Layout is fixed so downstream parsers can rely on
/// absolute offsets; values are written at full precision.
pub struct ReportExporter;

impl ReportExporter {
    pub fn to_bytes(input: &ReportInput<'_>) -> Result<Vec<u8>> {
        let mut workbook = build_workbook(input)?;
        Ok(workbook.save_to_buffer()?)
    }

    pub fn save(input: &ReportInput<'_>, path: &Path) -> Result<()> {
        let mut workbook = build_workbook(input)?;
        workbook.save(path)?;
        info!(file = %path.display(), "report written");
        Ok(())
    }
}

fn build_workbook(input: &ReportInput<'_>) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for (flow, table) in [(Flow::Export, input.exports), (Flow::Import, input.imports)] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(flow.label())?;
        write_sheet(sheet, input, table)?;
    }
    Ok(workbook)
}

fn write_sheet(sheet: &mut Worksheet, input: &ReportInput<'_>, table: &RankingTable) -> Result<()> {
    let bold = Format::new().set_bold();

    sheet.write_string_with_format(METADATA_ROW, 0, "Region", &bold)?;
    sheet.write_string(METADATA_ROW, 1, input.region)?;
    sheet.write_string_with_format(METADATA_ROW + 1, 0, "Period", &bold)?;
    sheet.write_string(METADATA_ROW + 1, 1, &input.period)?;

    for (col, header) in (0u16..).zip(TABLE_HEADERS) {
        sheet.write_string_with_format(TABLE_HEADER_ROW, col, header, &bold)?;
    }

    for (row, entry) in (TABLE_HEADER_ROW + 1..).zip(&table.rows) {
        // Others/Total carry no rank; leave the cell blank.
        if !entry.rank.is_empty() {
            sheet.write_string(row, 0, &entry.rank)?;
        }
        sheet.write_string(row, 1, &entry.label)?;
        sheet.write_number(row, 2, entry.value.to_f64().unwrap_or_default())?;
        sheet.write_number(row, 3, entry.percent.to_f64().unwrap_or_default())?;
    }

    sheet.set_column_width(1, 60.0)?;
    sheet.set_column_width(2, 20.0)?;
    sheet.set_column_width(3, 14.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MonthFilter, YearFilter};

    #[test]
    fn file_name_replaces_spaces() {
        assert_eq!(
            report_file_name("Foz do Iguaçu", "2022 - March"),
            "Relatorio_Comex_Foz_do_Iguaçu_2022 - March.xlsx"
        );
    }

    #[test]
    fn input_carries_period_and_data_flag() {
        let sel = FilterSelection::new("Curitiba", YearFilter::Year(2023), MonthFilter::All);
        let empty = RankingTable::default();
        let input = ReportInput::new(&sel, &empty, &empty);
        assert_eq!(input.period, "2023");
        assert!(!input.has_data());
        assert_eq!(input.file_name(), "Relatorio_Comex_Curitiba_2023.xlsx");
    }

    #[test]
    fn produces_a_zip_container() {
        let sel = FilterSelection::all_years("Curitiba");
        let empty = RankingTable::default();
        let bytes = ReportExporter::to_bytes(&ReportInput::new(&sel, &empty, &empty)).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
