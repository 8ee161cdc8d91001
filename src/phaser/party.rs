use crate::models::{CreditorTransaction, DebtorTransaction, LedgerSource, PartyRef};

use super::{PhaseError, Result};

fn require_party<'a, S: LedgerSource + ?Sized>(
    doc: &'static str,
    source: &'a S,
) -> Result<PartyRef<'a>> {
    source
        .party()
        .ok_or_else(|| PhaseError::convert(doc, "document has no party"))
}

/// Derives the debtor ledger row of a credit sale.
///
/// The full document amount is outstanding until a payment is received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtorTransactionPhaser;

impl DebtorTransactionPhaser {
    pub const DOC_NAME: &'static str = "Debtor Transaction";

    pub fn phase<S: LedgerSource + ?Sized>(&self, source: &S) -> Result<DebtorTransaction> {
        let party = require_party(Self::DOC_NAME, source)?;
        let h = source.header();

        Ok(DebtorTransaction {
            guidfixed: h.guidfixed.clone(),
            shopid: h.shopid.clone(),
            docno: h.docno.clone(),
            docdate: h.docdate,
            transflag: h.transflag,
            inquirytype: h.inquirytype,
            branchcode: h.branchcode.clone(),
            branchnames: h.branchnames.clone(),
            debtorcode: party.code.to_string(),
            debtornames: party.names.to_vec(),
            description: h.description.clone(),
            iscancel: h.iscancel,
            status: h.status,
            totalvalue: h.totalvalue,
            totalbeforevat: h.totalbeforevat,
            totalvatvalue: h.totalvatvalue,
            totalexceptvat: h.totalexceptvat,
            totalaftervat: h.totalaftervat,
            totalamount: h.totalamount,
            balanceamount: h.totalamount,
            paidamount: 0.0,
        })
    }
}

/// Derives the creditor ledger row of a credit purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreditorTransactionPhaser;

impl CreditorTransactionPhaser {
    pub const DOC_NAME: &'static str = "Creditor Transaction";

    pub fn phase<S: LedgerSource + ?Sized>(&self, source: &S) -> Result<CreditorTransaction> {
        let party = require_party(Self::DOC_NAME, source)?;
        let h = source.header();

        Ok(CreditorTransaction {
            guidfixed: h.guidfixed.clone(),
            shopid: h.shopid.clone(),
            docno: h.docno.clone(),
            docdate: h.docdate,
            transflag: h.transflag,
            inquirytype: h.inquirytype,
            branchcode: h.branchcode.clone(),
            branchnames: h.branchnames.clone(),
            creditorcode: party.code.to_string(),
            creditornames: party.names.to_vec(),
            description: h.description.clone(),
            iscancel: h.iscancel,
            status: h.status,
            totalvalue: h.totalvalue,
            totalbeforevat: h.totalbeforevat,
            totalvatvalue: h.totalvatvalue,
            totalexceptvat: h.totalexceptvat,
            totalaftervat: h.totalaftervat,
            totalamount: h.totalamount,
            balanceamount: h.totalamount,
            paidamount: 0.0,
        })
    }
}
