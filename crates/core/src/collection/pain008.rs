//! ISO 20022 pain.008.001.02 customer direct-debit initiation writer.
//!
//! Element order and nesting are part of the bank interface and must not
//! change. Only the subset used for SEPA CORE recurring collections is
//! written; no schema validation is performed.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};

use fincahub_shared::types::money::format_cents;

use super::error::CollectionError;
use super::types::{DirectDebitBatch, DirectDebitEntry};

/// Target schema namespace.
pub const PAIN_008_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";

/// Placeholder for an unknown debtor agent.
pub const NOT_PROVIDED: &str = "NOTPROVIDED";

const CREATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders the batch into a byte vector.
///
/// # Errors
///
/// Returns `CollectionError::Xml` if writing fails.
pub fn render(batch: &DirectDebitBatch) -> Result<Vec<u8>, CollectionError> {
    let mut out = Vec::new();
    write_document(&mut out, batch)?;
    Ok(out)
}

/// Writes the batch as a pain.008 document.
///
/// # Errors
///
/// Returns `CollectionError::Xml` if writing fails.
pub fn write_document<W: Write>(w: W, batch: &DirectDebitBatch) -> Result<(), CollectionError> {
    let mut wr = Writer::new_with_indent(w, b' ', 2);

    wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml)?;

    let mut doc = BytesStart::new("Document");
    doc.push_attribute(("xmlns", PAIN_008_NAMESPACE));
    wr.write_event(Event::Start(doc)).map_err(xml)?;
    open(&mut wr, "CstmrDrctDbtInitn")?;

    write_group_header(&mut wr, batch)?;
    write_payment_info(&mut wr, batch)?;

    close(&mut wr, "CstmrDrctDbtInitn")?;
    close(&mut wr, "Document")?;
    Ok(())
}

fn write_group_header<W: Write>(
    wr: &mut Writer<W>,
    batch: &DirectDebitBatch,
) -> Result<(), CollectionError> {
    open(wr, "GrpHdr")?;
    leaf(wr, "MsgId", &batch.message_id)?;
    leaf(wr, "CreDtTm", &batch.created_at.format(CREATION_FORMAT).to_string())?;
    leaf(wr, "NbOfTxs", &batch.number_of_transactions().to_string())?;
    leaf(wr, "CtrlSum", &format_cents(batch.control_sum()))?;
    open(wr, "InitgPty")?;
    leaf(wr, "Nm", &batch.creditor.initiating_party_name)?;
    close(wr, "InitgPty")?;
    close(wr, "GrpHdr")
}

fn write_payment_info<W: Write>(
    wr: &mut Writer<W>,
    batch: &DirectDebitBatch,
) -> Result<(), CollectionError> {
    open(wr, "PmtInf")?;
    leaf(wr, "PmtInfId", &batch.payment_info_id)?;
    leaf(wr, "PmtMtd", "DD")?;
    leaf(wr, "NbOfTxs", &batch.number_of_transactions().to_string())?;
    leaf(wr, "CtrlSum", &format_cents(batch.control_sum()))?;

    open(wr, "PmtTpInf")?;
    open(wr, "SvcLvl")?;
    leaf(wr, "Cd", "SEPA")?;
    close(wr, "SvcLvl")?;
    open(wr, "LclInstrm")?;
    leaf(wr, "Cd", "CORE")?;
    close(wr, "LclInstrm")?;
    leaf(wr, "SeqTp", "RCUR")?;
    close(wr, "PmtTpInf")?;

    leaf(wr, "ReqdColltnDt", &batch.collection_date.format(DATE_FORMAT).to_string())?;

    open(wr, "Cdtr")?;
    leaf(wr, "Nm", &batch.creditor.name)?;
    close(wr, "Cdtr")?;

    open(wr, "CdtrAcct")?;
    open(wr, "Id")?;
    leaf(wr, "IBAN", &batch.creditor.iban)?;
    close(wr, "Id")?;
    close(wr, "CdtrAcct")?;

    open(wr, "CdtrAgt")?;
    open(wr, "FinInstnId")?;
    leaf(wr, "BIC", &batch.creditor.bic)?;
    close(wr, "FinInstnId")?;
    close(wr, "CdtrAgt")?;

    for entry in &batch.entries {
        write_transaction(wr, batch, entry)?;
    }

    close(wr, "PmtInf")
}

fn write_transaction<W: Write>(
    wr: &mut Writer<W>,
    batch: &DirectDebitBatch,
    entry: &DirectDebitEntry,
) -> Result<(), CollectionError> {
    open(wr, "DrctDbtTxInf")?;

    open(wr, "PmtId")?;
    leaf(wr, "EndToEndId", &entry.end_to_end_id)?;
    close(wr, "PmtId")?;

    let currency = batch.currency.to_string();
    wr.write_event(Event::Start(
        BytesStart::new("InstdAmt").with_attributes([("Ccy", currency.as_str())]),
    ))
    .map_err(xml)?;
    text(wr, &format_cents(entry.amount))?;
    close(wr, "InstdAmt")?;

    open(wr, "DrctDbtTx")?;
    open(wr, "MndtRltdInf")?;
    leaf(wr, "MndtId", &entry.mandate_id)?;
    leaf(wr, "DtOfSgntr", &batch.mandate_signature_date.format(DATE_FORMAT).to_string())?;
    close(wr, "MndtRltdInf")?;
    close(wr, "DrctDbtTx")?;

    open(wr, "DbtrAgt")?;
    open(wr, "FinInstnId")?;
    open(wr, "Othr")?;
    leaf(wr, "Id", NOT_PROVIDED)?;
    close(wr, "Othr")?;
    close(wr, "FinInstnId")?;
    close(wr, "DbtrAgt")?;

    open(wr, "Dbtr")?;
    leaf(wr, "Nm", &entry.payer.name)?;
    close(wr, "Dbtr")?;

    open(wr, "DbtrAcct")?;
    open(wr, "Id")?;
    leaf(wr, "IBAN", &entry.payer.iban)?;
    close(wr, "Id")?;
    close(wr, "DbtrAcct")?;

    open(wr, "RmtInf")?;
    leaf(wr, "Ustrd", &batch.concept)?;
    close(wr, "RmtInf")?;

    close(wr, "DrctDbtTxInf")
}

fn open<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<(), CollectionError> {
    wr.write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml)
}

fn close<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<(), CollectionError> {
    wr.write_event(Event::End(BytesStart::new(name).to_end()))
        .map_err(xml)
}

fn text<W: Write>(wr: &mut Writer<W>, value: &str) -> Result<(), CollectionError> {
    wr.write_event(Event::Text(BytesText::new(value)))
        .map_err(xml)
}

fn leaf<W: Write>(wr: &mut Writer<W>, name: &str, value: &str) -> Result<(), CollectionError> {
    open(wr, name)?;
    text(wr, value)?;
    close(wr, name)
}

fn xml<E: std::fmt::Display>(e: E) -> CollectionError {
    CollectionError::Xml(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::types::{CreditorInfo, Payer};
    use chrono::{NaiveDate, TimeZone, Utc};
    use fincahub_shared::types::Currency;
    use quick_xml::Reader;
    use rust_decimal_macros::dec;

    fn batch(names: &[&str]) -> DirectDebitBatch {
        DirectDebitBatch {
            message_id: "MSG-1".to_string(),
            payment_info_id: "PMT-1".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 5).unwrap(),
            collection_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            creditor: CreditorInfo {
                initiating_party_name: "CP Calle Mayor 5".to_string(),
                name: "Administracion Lopez".to_string(),
                iban: "ES9800000000000000000000".to_string(),
                bic: "TESTBICXXX".to_string(),
            },
            mandate_signature_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            currency: Currency::Eur,
            concept: "Cuota <Octubre> & derrama".to_string(),
            entries: names
                .iter()
                .enumerate()
                .map(|(i, name)| DirectDebitEntry {
                    end_to_end_id: format!("TX-{i}"),
                    mandate_id: format!("MANDATE-{i}"),
                    payer: Payer {
                        name: (*name).to_string(),
                        iban: format!("ES{i:022}"),
                    },
                    amount: dec!(50),
                })
                .collect(),
        }
    }

    /// Start-tag names in document order.
    fn element_names(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut names = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap()),
                Event::Eof => break,
                _ => {}
            }
        }
        names
    }

    #[test]
    fn test_header_fields() {
        let bytes = render(&batch(&["Ana", "Luis"])).unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Document xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02\">"));
        assert!(xml.contains("<CreDtTm>2026-10-18T09:30:05.000Z</CreDtTm>"));
        assert!(xml.contains("<NbOfTxs>2</NbOfTxs>"));
        assert_eq!(xml.matches("<CtrlSum>100.00</CtrlSum>").count(), 2);
        assert!(xml.contains("<ReqdColltnDt>2026-10-18</ReqdColltnDt>"));
        assert!(xml.contains("<InstdAmt Ccy=\"EUR\">50.00</InstdAmt>"));
        assert!(xml.contains("<DtOfSgntr>2024-01-01</DtOfSgntr>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = String::from_utf8(render(&batch(&["O'Brien & Hijos"])).unwrap()).unwrap();
        assert!(xml.contains("Cuota &lt;Octubre&gt; &amp; derrama"));
        assert!(!xml.contains("<Octubre>"));
    }

    #[test]
    fn test_element_order() {
        let xml = String::from_utf8(render(&batch(&["Ana"])).unwrap()).unwrap();
        let expected = [
            "Document", "CstmrDrctDbtInitn",
            "GrpHdr", "MsgId", "CreDtTm", "NbOfTxs", "CtrlSum", "InitgPty", "Nm",
            "PmtInf", "PmtInfId", "PmtMtd", "NbOfTxs", "CtrlSum",
            "PmtTpInf", "SvcLvl", "Cd", "LclInstrm", "Cd", "SeqTp",
            "ReqdColltnDt", "Cdtr", "Nm", "CdtrAcct", "Id", "IBAN",
            "CdtrAgt", "FinInstnId", "BIC",
            "DrctDbtTxInf", "PmtId", "EndToEndId", "InstdAmt",
            "DrctDbtTx", "MndtRltdInf", "MndtId", "DtOfSgntr",
            "DbtrAgt", "FinInstnId", "Othr", "Id",
            "Dbtr", "Nm", "DbtrAcct", "Id", "IBAN", "RmtInf", "Ustrd",
        ];
        assert_eq!(element_names(&xml), expected);
    }

    #[test]
    fn test_one_transaction_block_per_payer() {
        let xml = String::from_utf8(render(&batch(&["Ana", "Luis", "Eva"])).unwrap()).unwrap();
        assert_eq!(xml.matches("<DrctDbtTxInf>").count(), 3);
        assert!(xml.contains("<MndtId>MANDATE-2</MndtId>"));
    }
}
