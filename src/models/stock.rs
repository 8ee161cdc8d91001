//! Stock ledger records.
//!
//! Cost and balance columns are computed downstream by the costing job; the
//! consumer writes them as zero and ignores them when comparing content.

use chrono::{DateTime, Utc};

use super::names::NameX;
use super::SameContent;
use crate::storage::{pg_row, TransactionRecord};

pg_row! {
    pub struct StockTransaction {
        flatten {}
        columns {
            guidfixed: String => "guidfixed",
            shopid: String => "shopid",
            docno: String => "docno",
            docdate: DateTime<Utc> => "docdate",
            guidref: String => "guidref",
            docreftype: i16 => "docreftype",
            docrefno: String => "docrefno",
            docrefdate: DateTime<Utc> => "docrefdate",
            branchcode: String => "branchcode",
            branchnames: Vec<NameX> => "branchnames",
            inquirytype: i32 => "inquirytype",
            transflag: i16 => "transflag",
            vattype: i16 => "vattype",
            vatrate: f64 => "vatrate",
            description: String => "description",
            totalvalue: f64 => "totalvalue",
            discountword: String => "discountword",
            totaldiscount: f64 => "totaldiscount",
            totalbeforevat: f64 => "totalbeforevat",
            totalvatvalue: f64 => "totalvatvalue",
            totalexceptvat: f64 => "totalexceptvat",
            totalaftervat: f64 => "totalaftervat",
            totalamount: f64 => "totalamount",
            totalcost: f64 => "totalcost",
            status: i16 => "status",
            iscancel: bool => "iscancel",
        }
        lines {
            details: Vec<StockTransactionDetail> => "details"
        }
    }
}

pg_row! {
    pub struct StockTransactionDetail {
        flatten {}
        columns {
            shopid: String => "shopid",
            docno: String => "docno",
            linenumber: i32 => "linenumber",
            barcode: String => "barcode",
            unitcode: String => "unitcode",
            qty: f64 => "qty",
            price: f64 => "price",
            discount: String => "discount",
            discountamount: f64 => "discountamount",
            sumamount: f64 => "sumamount",
            standvalue: f64 => "standvalue",
            dividevalue: f64 => "dividevalue",
            calcflag: i16 => "calcflag",
            costperunit: f64 => "costperunit",
            totalcost: f64 => "totalcost",
            whcode: String => "whcode",
            locationcode: String => "locationcode",
            sumamountexcludevat: f64 => "sumamountexcludevat",
            totalvaluevat: f64 => "totalvaluevat",
            itemguid: String => "itemguid",
            vattype: i16 => "vattype",
            taxtype: i16 => "taxtype",
            priceexcludevat: f64 => "priceexcludevat",
            itemtype: i16 => "itemtype",
            docref: String => "docref",
            balanceqty: f64 => "balanceqty",
            balanceamount: f64 => "balanceamount",
            balanceaverage: f64 => "balanceaverage",
        }
    }
}

impl StockTransaction {
    /// Copy with the downstream-computed columns cleared.
    fn without_costing(&self) -> Self {
        let mut out = self.clone();
        out.totalcost = 0.0;
        for detail in &mut out.details {
            detail.costperunit = 0.0;
            detail.totalcost = 0.0;
            detail.balanceqty = 0.0;
            detail.balanceamount = 0.0;
            detail.balanceaverage = 0.0;
        }
        out
    }
}

impl SameContent for StockTransaction {
    fn same_content(&self, other: &Self) -> bool {
        self.without_costing() == other.without_costing()
    }
}

impl TransactionRecord for StockTransaction {
    type Line = StockTransactionDetail;

    fn shop_id(&self) -> &str {
        &self.shopid
    }

    fn doc_no(&self) -> &str {
        &self.docno
    }

    fn lines(&self) -> &[StockTransactionDetail] {
        &self.details
    }

    fn set_lines(&mut self, lines: Vec<StockTransactionDetail>) {
        self.details = lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StockTransaction {
        StockTransaction {
            shopid: "shop1".to_string(),
            docno: "SI001".to_string(),
            totalamount: 100.0,
            details: vec![StockTransactionDetail {
                shopid: "shop1".to_string(),
                docno: "SI001".to_string(),
                barcode: "B001".to_string(),
                qty: 2.0,
                calcflag: -1,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_same_content_ignores_costing_columns() {
        let stored = {
            let mut s = sample();
            s.totalcost = 40.0;
            s.details[0].costperunit = 20.0;
            s.details[0].totalcost = 40.0;
            s.details[0].balanceqty = 8.0;
            s.details[0].balanceamount = 160.0;
            s.details[0].balanceaverage = 20.0;
            s
        };
        assert!(sample().same_content(&stored));
    }

    #[test]
    fn test_same_content_detects_qty_change() {
        let mut changed = sample();
        changed.details[0].qty = 3.0;
        assert!(!sample().same_content(&changed));
    }

    #[test]
    fn test_same_content_detects_removed_line() {
        let mut changed = sample();
        changed.details.clear();
        assert!(!sample().same_content(&changed));
    }
}
