//! Wire shapes of the documents published on the document topics.
//!
//! Item documents (sale invoice, purchase, stock moves, payments) share
//! `TransactionDocument`. Debtor payments also list the bills they settle,
//! read through `DebtorPaymentDocument`. Fields absent from a message take
//! their defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::names::NameX;

/// Branch the document was issued from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionBranch {
    pub guidfixed: String,
    pub code: String,
    pub names: Option<Vec<NameX>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentCreditCard {
    pub docdatetime: DateTime<Utc>,
    pub cardnumber: String,
    pub amount: f64,
    pub chargeword: String,
    pub chargevalue: f64,
    pub totalnetworth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentTransfer {
    pub docdatetime: DateTime<Utc>,
    pub bankcode: String,
    pub banknames: Option<Vec<NameX>>,
    pub accountnumber: String,
    pub amount: f64,
}

/// Payment breakdown of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentDetail {
    pub cashamount: f64,
    pub cashamounttext: String,
    pub paymentcreditcards: Option<Vec<PaymentCreditCard>>,
    pub paymenttransfers: Option<Vec<PaymentTransfer>>,
}

impl PaymentDetail {
    pub fn credit_card_total(&self) -> f64 {
        self.paymentcreditcards
            .iter()
            .flatten()
            .map(|card| card.amount)
            .sum()
    }

    pub fn transfer_total(&self) -> f64 {
        self.paymenttransfers
            .iter()
            .flatten()
            .map(|transfer| transfer.amount)
            .sum()
    }
}

/// One line of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentDetail {
    pub inquirytype: i16,
    pub linenumber: i32,
    pub docdatetime: DateTime<Utc>,
    pub docref: String,
    pub docrefdatetime: DateTime<Utc>,
    pub calcflag: i16,
    pub barcode: String,
    pub itemcode: String,
    pub itemnames: Option<Vec<NameX>>,
    pub unitcode: String,
    pub unitnames: Option<Vec<NameX>>,
    pub itemtype: i16,
    pub itemguid: String,
    pub qty: f64,
    pub totalqty: f64,
    pub price: f64,
    pub discount: String,
    pub discountamount: f64,
    pub totalvaluevat: f64,
    pub priceexcludevat: f64,
    pub sumamount: f64,
    pub sumamountexcludevat: f64,
    pub sumamountchoice: f64,
    pub refguid: String,
    pub dividevalue: f64,
    pub standvalue: f64,
    pub vattype: i16,
    pub taxtype: i16,
    pub vatcal: i32,
    pub remark: String,
    pub foodtype: i16,
    pub ischoice: i16,
    pub whcode: String,
    pub whnames: Option<Vec<NameX>>,
    pub locationcode: String,
    pub locationnames: Option<Vec<NameX>>,
    pub towhcode: String,
    pub tolocationcode: String,
    pub groupcode: String,
    pub groupnames: Option<Vec<NameX>>,
    pub manufacturerguid: String,
    pub manufacturercode: String,
    pub manufacturernames: Option<Vec<NameX>>,
}

/// A business document message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDocument {
    pub shopid: String,
    pub guidfixed: String,

    pub docno: String,
    pub docdatetime: DateTime<Utc>,
    pub guidref: String,
    pub devicename: String,
    pub guidpos: String,
    pub transflag: i16,
    pub doctype: i16,
    pub inquirytype: i32,
    pub docreftype: i16,
    pub docrefno: String,
    pub docrefdate: DateTime<Utc>,
    pub taxdocdate: DateTime<Utc>,
    pub taxdocno: String,
    pub vattype: i16,
    pub vatrate: f64,

    pub custcode: String,
    pub custnames: Option<Vec<NameX>>,
    pub description: String,
    pub discountword: String,

    pub totaldiscount: f64,
    pub totalvalue: f64,
    pub totalexceptvat: f64,
    pub totalaftervat: f64,
    pub totalbeforevat: f64,
    pub totalvatvalue: f64,
    pub totalamount: f64,
    pub totalcost: f64,

    pub posid: String,
    pub cashiercode: String,
    pub salecode: String,
    pub salename: String,
    pub membercode: String,
    pub iscancel: bool,
    pub ismanualamount: bool,
    pub status: i16,

    pub paymentdetail: PaymentDetail,
    pub paymentdetailraw: String,
    pub paycashamount: f64,
    pub branch: TransactionBranch,

    pub ispos: bool,
    pub detaildiscountformula: String,
    pub detailtotalamount: f64,
    pub totaldiscountvatamount: f64,
    pub totaldiscountexceptvatamount: f64,
    pub detailtotaldiscount: f64,

    /// `None` when the message carries no `details` key or an explicit null.
    pub details: Option<Vec<DocumentDetail>>,
}

/// A bill settled by a debtor payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtorPaymentBill {
    pub selected: bool,
    pub docno: String,
    pub docdatetime: DateTime<Utc>,
    pub transflag: i16,
    pub value: f64,
    pub balance: f64,
    pub paymentamount: f64,
}

/// A debtor payment message: the bills a customer settles and how.
///
/// Published on the `paid` topics. Its lines are bills, not items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtorPaymentDocument {
    pub shopid: String,
    pub guidfixed: String,
    pub docno: String,
    pub docdatetime: DateTime<Utc>,
    pub transflag: i16,
    pub doctype: i16,
    pub branch: TransactionBranch,
    pub custcode: String,
    pub custnames: Option<Vec<NameX>>,
    pub salecode: String,
    pub salename: String,
    pub iscancel: bool,
    pub totalpaymentamount: f64,
    pub totalamount: f64,
    pub totalbalance: f64,
    pub totalvalue: f64,
    pub paymentdetail: PaymentDetail,
    pub paymentdetailraw: String,
    pub details: Option<Vec<DebtorPaymentBill>>,
}
