use crate::models::{
    LedgerSource, StockTransaction, StockTransactionDetail, TransactionDetail, TransactionHeader,
};

/// Derives the stock ledger row from a phased document record.
///
/// Each document type moves stock in one direction, so the line `calcflag`
/// is fixed per type. Stock adjustments and transfers carry the direction
/// per line; a transfer issues from one warehouse and receives into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockTransactionPhaser {
    calc_flag: Option<i16>,
}

impl StockTransactionPhaser {
    pub const fn sale_invoice() -> Self {
        Self { calc_flag: Some(-1) }
    }

    pub const fn sale_invoice_return() -> Self {
        Self { calc_flag: Some(1) }
    }

    pub const fn purchase() -> Self {
        Self { calc_flag: Some(1) }
    }

    pub const fn purchase_return() -> Self {
        Self { calc_flag: Some(-1) }
    }

    pub const fn stock_pickup() -> Self {
        Self { calc_flag: Some(-1) }
    }

    pub const fn stock_balance() -> Self {
        Self { calc_flag: Some(1) }
    }

    pub const fn stock_receive() -> Self {
        Self { calc_flag: Some(1) }
    }

    pub const fn stock_return() -> Self {
        Self { calc_flag: Some(-1) }
    }

    pub const fn stock_adjustment() -> Self {
        Self { calc_flag: None }
    }

    pub const fn stock_transfer() -> Self {
        Self { calc_flag: None }
    }

    /// Fixed direction, or `None` when each line carries its own.
    pub fn calc_flag(&self) -> Option<i16> {
        self.calc_flag
    }

    pub fn phase<S: LedgerSource + ?Sized>(&self, source: &S) -> StockTransaction {
        let h = source.header();
        StockTransaction {
            guidfixed: h.guidfixed.clone(),
            shopid: h.shopid.clone(),
            docno: h.docno.clone(),
            docdate: h.docdate,
            guidref: h.guidref.clone(),
            docreftype: h.docreftype,
            docrefno: h.docrefno.clone(),
            docrefdate: h.docrefdate,
            branchcode: h.branchcode.clone(),
            branchnames: h.branchnames.clone(),
            inquirytype: h.inquirytype,
            transflag: h.transflag,
            vattype: h.vattype,
            vatrate: h.vatrate,
            description: h.description.clone(),
            totalvalue: h.totalvalue,
            discountword: h.discountword.clone(),
            totaldiscount: h.totaldiscount,
            totalbeforevat: h.totalbeforevat,
            totalvatvalue: h.totalvatvalue,
            totalexceptvat: h.totalexceptvat,
            totalaftervat: h.totalaftervat,
            totalamount: h.totalamount,
            totalcost: 0.0,
            status: h.status,
            iscancel: h.iscancel,
            details: source
                .detail_lines()
                .iter()
                .map(|line| self.phase_line(h, line))
                .collect(),
        }
    }

    fn phase_line(&self, h: &TransactionHeader, line: &TransactionDetail) -> StockTransactionDetail {
        StockTransactionDetail {
            shopid: h.shopid.clone(),
            docno: h.docno.clone(),
            linenumber: line.linenumber,
            barcode: line.barcode.clone(),
            unitcode: line.unitcode.clone(),
            qty: line.qty,
            price: line.price,
            discount: line.discount.clone(),
            discountamount: line.discountamount,
            sumamount: line.sumamount,
            standvalue: line.standvalue,
            dividevalue: line.dividevalue,
            calcflag: self.calc_flag.unwrap_or(line.calcflag),
            costperunit: 0.0,
            totalcost: 0.0,
            whcode: line.whcode.clone(),
            locationcode: line.locationcode.clone(),
            sumamountexcludevat: line.sumamountexcludevat,
            totalvaluevat: line.totalvaluevat,
            itemguid: line.itemguid.clone(),
            vattype: line.vattype,
            taxtype: line.taxtype,
            priceexcludevat: line.priceexcludevat,
            itemtype: line.itemtype,
            docref: line.docref.clone(),
            balanceqty: 0.0,
            balanceamount: 0.0,
            balanceaverage: 0.0,
        }
    }
}
