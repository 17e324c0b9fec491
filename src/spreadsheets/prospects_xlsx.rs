use crate::domain::Prospect;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 7] = [
    "Recipient",
    "Address",
    "City",
    "County",
    "Sq Ft",
    "Year Built",
    "Age (yrs)",
];

/// Direct-mail addressing needs no owner name.
const RECIPIENT: &str = "Current Resident";

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Workbook bytes, one row per prospect in the given order.
pub fn prospects_workbook(prospects: &[Prospect]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err("header"))?;
    }

    for (i, p) in prospects.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, RECIPIENT)
            .map_err(xlsx_err("recipient"))?;
        worksheet
            .write_string(r, 1, &p.address)
            .map_err(xlsx_err("address"))?;
        worksheet
            .write_string(r, 2, &p.city)
            .map_err(xlsx_err("city"))?;
        worksheet
            .write_string(r, 3, &p.county)
            .map_err(xlsx_err("county"))?;
        worksheet
            .write_number(r, 4, p.sqft as f64)
            .map_err(xlsx_err("sqft"))?;
        worksheet
            .write_number(r, 5, p.built_year as f64)
            .map_err(xlsx_err("year built"))?;
        worksheet
            .write_number(r, 6, p.age as f64)
            .map_err(xlsx_err("age"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_prospects_xlsx(prospects: &[Prospect], date: &str) -> ResultResp {
    let buffer = prospects_workbook(prospects)?;
    xlsx_response(buffer, &format!("prospects-{date}.xlsx"))
}
