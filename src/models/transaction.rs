//! Header and detail columns shared by every document record.

use chrono::{DateTime, Utc};

use super::names::NameX;
use crate::storage::pg_row;

pg_row! {
    /// Document header columns, keyed by (`shopid`, `docno`).
    pub struct TransactionHeader {
        flatten {}
        columns {
            guidfixed: String => "guidfixed",
            shopid: String => "shopid",
            docno: String => "docno",
            docdate: DateTime<Utc> => "docdate",
            inquirytype: i32 => "inquirytype",
            /// Document type and sign, e.g. 44 for a sale invoice.
            transflag: i16 => "transflag",
            docreftype: i16 => "docreftype",
            docrefno: String => "docrefno",
            docrefdate: DateTime<Utc> => "docrefdate",
            guidref: String => "guidref",
            taxdocno: String => "taxdocno",
            taxdocdate: DateTime<Utc> => "taxdocdate",
            devicename: String => "devicename",
            guidpos: String => "guidpos",
            branchcode: String => "branchcode",
            branchnames: Vec<NameX> => "branchnames",
            description: String => "description",
            discountword: String => "discountword",
            iscancel: bool => "iscancel",
            isbom: bool => "isbom",
            status: i16 => "status",
            ismanualamount: bool => "ismanualamount",
            vattype: i16 => "vattype",
            vatrate: f64 => "vatrate",
            totalvalue: f64 => "totalvalue",
            deliveryamount: f64 => "deliveryamount",
            totaldiscount: f64 => "totaldiscount",
            totalbeforevat: f64 => "totalbeforevat",
            totalvatvalue: f64 => "totalvatvalue",
            totalexceptvat: f64 => "totalexceptvat",
            totalaftervat: f64 => "totalaftervat",
            totalamount: f64 => "totalamount",
            alcoholamount: f64 => "alcoholamount",
            otheramount: f64 => "otheramount",
            drinkamount: f64 => "drinkamount",
            foodamount: f64 => "foodamount",
        }
    }
}

pg_row! {
    /// One document line, keyed by (`shopid`, `docno`, `linenumber`).
    pub struct TransactionDetail {
        flatten {}
        columns {
            shopid: String => "shopid",
            docno: String => "docno",
            linenumber: i32 => "linenumber",
            docdate: DateTime<Utc> => "docdate",
            barcode: String => "barcode",
            itemnames: Vec<NameX> => "itemnames",
            unitcode: String => "unitcode",
            unitnames: Vec<NameX> => "unitnames",
            itemtype: i16 => "itemtype",
            itemguid: String => "itemguid",
            qty: f64 => "qty",
            price: f64 => "price",
            priceexcludevat: f64 => "priceexcludevat",
            discount: String => "discount",
            discountamount: f64 => "discountamount",
            sumamount: f64 => "sumamount",
            sumamountexcludevat: f64 => "sumamountexcludevat",
            sumamountchoice: f64 => "sumamountchoice",
            totalvaluevat: f64 => "totalvaluevat",
            refguid: String => "refguid",
            docref: String => "docref",
            docrefdatetime: DateTime<Utc> => "docrefdatetime",
            remark: String => "remark",
            whcode: String => "whcode",
            whnames: Vec<NameX> => "whnames",
            locationcode: String => "locationcode",
            locationnames: Vec<NameX> => "locationnames",
            whcodedestination: String => "whcodedestination",
            locationcodedestination: String => "locationcodedestination",
            vatcal: i32 => "vatcal",
            foodtype: i16 => "foodtype",
            vattype: i16 => "vattype",
            taxtype: i16 => "taxtype",
            ischoice: i16 => "ischoice",
            /// Stock direction of the line: +1 in, -1 out.
            calcflag: i16 => "calcflag",
            standvalue: f64 => "standvalue",
            dividevalue: f64 => "dividevalue",
            groupcode: String => "groupcode",
            groupnames: Vec<NameX> => "groupnames",
            manufacturerguid: String => "manufacturerguid",
            manufacturercode: String => "manufacturercode",
            manufacturernames: Vec<NameX> => "manufacturernames",
        }
    }
}
