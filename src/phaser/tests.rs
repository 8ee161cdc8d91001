use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::models::{NameX, TransactionDocument};

use super::*;

fn names(th: &str) -> serde_json::Value {
    json!([{ "code": "th", "name": th, "isauto": false, "isdelete": false }])
}

fn detail(linenumber: i32, barcode: &str, qty: f64, calcflag: i16) -> serde_json::Value {
    json!({
        "inquirytype": 1,
        "linenumber": linenumber,
        "docdatetime": "2023-06-22T06:48:15.000Z",
        "docref": "",
        "docrefdatetime": "2023-06-22T06:48:15.000Z",
        "calcflag": calcflag,
        "barcode": barcode,
        "itemcode": "ITEM001",
        "itemnames": names("มาม่า"),
        "unitcode": "ENV",
        "unitnames": names("ซอง"),
        "itemguid": "2PrfDoufKF7KF0Ua2V6sbHBlm2R",
        "qty": qty,
        "totalqty": qty,
        "price": 12,
        "discount": "0",
        "sumamount": 12.0 * qty,
        "dividevalue": 1,
        "standvalue": 1,
        "vattype": 1,
        "whcode": "00000",
        "whnames": names("คลังสำนักงานใหญ่"),
        "towhcode": "00001",
        "locationnames": []
    })
}

fn sale_invoice_json() -> serde_json::Value {
    json!({
        "shopid": "2IZS0jFeRXWPidSupyXN7zQIlaS",
        "guidfixed": "2RYC4E1s7hYcB7uV6Ykhf9zGmPq",
        "docno": "SI2023062200001",
        "docdatetime": "2023-06-22T06:48:15.000Z",
        "transflag": 44,
        "doctype": 1,
        "inquirytype": 0,
        "vattype": 1,
        "vatrate": 7,
        "custcode": "POS001",
        "custnames": names("ลูกค้าทั่วไป"),
        "totalvalue": 2000,
        "totalbeforevat": 1869.16,
        "totalvatvalue": 130.84,
        "totalaftervat": 2000,
        "totalamount": 2000,
        "salecode": "SALE001",
        "salename": "นาย ขายดี",
        "paymentdetail": {
            "cashamount": 500,
            "cashamounttext": "",
            "paymentcreditcards": [
                { "cardnumber": "4111", "amount": 700, "chargevalue": 0 },
                { "cardnumber": "5500", "amount": 300, "chargevalue": 0 }
            ],
            "paymenttransfers": [
                { "bankcode": "KBANK", "accountnumber": "123", "amount": 500 }
            ]
        },
        "paymentdetailraw": "",
        "branch": { "code": "branch01", "names": names("สาขาที่ 1") },
        "details": [detail(0, "BARCODE001", 10.0, 0), detail(1, "BARCODE008", 5.0, 0)]
    })
}

fn stock_balance_json() -> serde_json::Value {
    json!({
        "shopid": "2PrIIqTWxoBXv16K310sNwfHmfY",
        "docno": "SB2023070100001",
        "docdatetime": "2023-07-01T03:00:00.000Z",
        "transflag": 60,
        "branch": { "code": "00000" },
        "details": [detail(0, "B001", 4.0, 1), detail(1, "B002", 6.0, 1)]
    })
}

fn stock_adjustment_json() -> serde_json::Value {
    json!({
        "shopid": "2PrIIqTWxoBXv16K310sNwfHmfY",
        "docno": "SA2023070100001",
        "docdatetime": "2023-07-01T03:00:00.000Z",
        "transflag": 66,
        "branch": { "code": "branch01", "names": names("สาขาที่ 1") },
        "details": [detail(0, "B001", 2.0, 1), detail(1, "B002", 3.0, -1)]
    })
}

#[test]
fn test_sale_invoice_header_fields() {
    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&sale_invoice_json().to_string())
        .unwrap();

    assert_eq!(sale.header.shopid, "2IZS0jFeRXWPidSupyXN7zQIlaS");
    assert_eq!(sale.header.docno, "SI2023062200001");
    assert_eq!(sale.header.transflag, 44);
    assert_eq!(
        sale.header.docdate,
        Utc.with_ymd_and_hms(2023, 6, 22, 6, 48, 15).unwrap()
    );
    assert_eq!(sale.header.branchcode, "branch01");
    assert_eq!(sale.debtorcode, "POS001");
    assert_eq!(sale.salecode, "SALE001");
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.items[1].barcode, "BARCODE008");
    assert_eq!(sale.items[1].docno, "SI2023062200001");
    assert_eq!(sale.items[0].whcodedestination, "00001");
    assert_eq!(sale.items[0].itemnames[0].name.as_deref(), Some("มาม่า"));
}

#[test]
fn test_sale_invoice_sums_pay_amounts() {
    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&sale_invoice_json().to_string())
        .unwrap();

    assert_eq!(sale.totalpaycash, 500.0);
    assert_eq!(sale.totalpaycredit, 1000.0);
    assert_eq!(sale.totalpaytransfer, 500.0);
}

#[test]
fn test_sale_return_uses_return_flag() {
    let sale = SaleTransactionPhaser::sale_invoice_return()
        .phase_single_doc(&sale_invoice_json().to_string())
        .unwrap();
    assert_eq!(sale.header.transflag, 48);
}

#[test]
fn test_purchase_flags_and_creditor() {
    let msg = sale_invoice_json().to_string();

    let purchase = PurchaseTransactionPhaser::purchase()
        .phase_single_doc(&msg)
        .unwrap();
    assert_eq!(purchase.header.transflag, 12);
    assert_eq!(purchase.creditorcode, "POS001");

    let purchase_return = PurchaseTransactionPhaser::purchase_return()
        .phase_single_doc(&msg)
        .unwrap();
    assert_eq!(purchase_return.header.transflag, 16);
}

#[test]
fn test_debtor_row_from_sale_invoice() {
    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&sale_invoice_json().to_string())
        .unwrap();

    let debtor = DebtorTransactionPhaser.phase(&sale).unwrap();

    assert_eq!(debtor.balanceamount, 2000.0);
    assert_eq!(debtor.paidamount, 0.0);
    assert_eq!(debtor.debtorcode, "POS001");
    assert_eq!(debtor.docno, "SI2023062200001");
    assert_eq!(debtor.transflag, 44);
}

#[test]
fn test_creditor_row_requires_party() {
    let inventory = InventoryTransactionPhaser::stock_balance()
        .phase_single_doc(&stock_balance_json().to_string())
        .unwrap();

    let err = CreditorTransactionPhaser.phase(&inventory).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Error on Convert Creditor Transaction : "));
}

#[test]
fn test_stock_balance_two_lines() {
    let balance = InventoryTransactionPhaser::stock_balance()
        .phase_single_doc(&stock_balance_json().to_string())
        .unwrap();

    assert_eq!(balance.items.len(), 2);
    assert_eq!(balance.header.shopid, "2PrIIqTWxoBXv16K310sNwfHmfY");
    assert_eq!(balance.header.docno, "SB2023070100001");
    for item in &balance.items {
        assert_eq!(item.shopid, "2PrIIqTWxoBXv16K310sNwfHmfY");
        assert_eq!(item.docno, "SB2023070100001");
    }
}

#[test]
fn test_stock_adjustment_keeps_flag_and_branch() {
    let adjustment = InventoryTransactionPhaser::stock_adjustment()
        .phase_single_doc(&stock_adjustment_json().to_string())
        .unwrap();

    assert_eq!(adjustment.header.transflag, 66);
    assert_eq!(adjustment.header.branchcode, "branch01");
    assert_eq!(
        adjustment.header.branchnames,
        vec![NameX::new("th", "สาขาที่ 1")]
    );
}

#[test]
fn test_stock_phaser_fixes_direction_per_document_type() {
    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&sale_invoice_json().to_string())
        .unwrap();

    let stock = StockTransactionPhaser::sale_invoice().phase(&sale);
    assert_eq!(stock.details.len(), 2);
    assert!(stock.details.iter().all(|d| d.calcflag == -1));
    assert_eq!(stock.transflag, 44);
    assert_eq!(stock.totalcost, 0.0);

    let stock = StockTransactionPhaser::sale_invoice_return().phase(&sale);
    assert!(stock.details.iter().all(|d| d.calcflag == 1));
}

#[test]
fn test_stock_adjustment_keeps_line_direction() {
    let adjustment = InventoryTransactionPhaser::stock_adjustment()
        .phase_single_doc(&stock_adjustment_json().to_string())
        .unwrap();

    let stock = StockTransactionPhaser::stock_adjustment().phase(&adjustment);
    let flags: Vec<i16> = stock.details.iter().map(|d| d.calcflag).collect();
    assert_eq!(flags, vec![1, -1]);
    assert_eq!(stock.details[1].qty, 3.0);
}

#[test]
fn test_missing_details_is_convert_error() {
    let mut doc = sale_invoice_json();
    doc.as_object_mut().unwrap().remove("details");

    let err = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&doc.to_string())
        .unwrap_err();
    assert!(!err.is_decode());
    assert_eq!(
        err.to_string(),
        "Error on Convert Sale Invoice : details is missing"
    );
}

#[test]
fn test_null_details_is_convert_error() {
    let mut doc = sale_invoice_json();
    doc["details"] = serde_json::Value::Null;

    let err = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&doc.to_string())
        .unwrap_err();
    assert!(matches!(err, PhaseError::Convert { .. }));
}

#[test]
fn test_malformed_json_is_decode_error() {
    let err = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc("{not json")
        .unwrap_err();
    assert!(err.is_decode());
    assert!(err
        .to_string()
        .starts_with("Cannot Unmarshal Sale Invoice Message : "));
}

#[test]
fn test_bulk_expects_array() {
    let err = SaleTransactionPhaser::sale_invoice()
        .phase_multiple_doc(&sale_invoice_json().to_string())
        .unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn test_timestamps_truncated_to_micros() {
    let mut doc = sale_invoice_json();
    doc["docdatetime"] = json!("2023-06-22T06:48:15.123456789Z");
    doc["details"][0]["docdatetime"] = json!("2024-02-08T02:49:36.564987654Z");

    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&doc.to_string())
        .unwrap();
    assert_eq!(sale.header.docdate.timestamp_subsec_nanos(), 123_456_000);
    assert_eq!(sale.items[0].docdate.timestamp_subsec_nanos(), 564_987_000);
}

#[test]
fn test_lines_keep_their_own_date() {
    let mut doc = sale_invoice_json();
    doc["details"][0]["docdatetime"] = json!("2024-02-08T02:49:36.564Z");

    let sale = SaleTransactionPhaser::sale_invoice()
        .phase_single_doc(&doc.to_string())
        .unwrap();

    assert_eq!(
        sale.header.docdate,
        Utc.with_ymd_and_hms(2023, 6, 22, 6, 48, 15).unwrap()
    );
    assert_eq!(
        sale.items[0].docdate,
        Utc.with_ymd_and_hms(2024, 2, 8, 2, 49, 36).unwrap()
            + chrono::Duration::milliseconds(564)
    );
    assert_eq!(
        sale.items[1].docdate,
        Utc.with_ymd_and_hms(2023, 6, 22, 6, 48, 15).unwrap()
    );
}

#[test]
fn test_null_names_become_empty() {
    let mut doc = stock_balance_json();
    doc["details"][0]["itemnames"] = serde_json::Value::Null;

    let balance = InventoryTransactionPhaser::stock_balance()
        .phase_single_doc(&doc.to_string())
        .unwrap();
    assert!(balance.items[0].itemnames.is_empty());
    assert!(balance.header.branchnames.is_empty());
}

#[test]
fn test_parse_transaction_to_payment() {
    let doc: TransactionDocument = serde_json::from_value(json!({
        "docno": "doc1",
        "paymentdetailraw": "{\"cashamount\":1.0,\"cashamounttext\":\"\",\"paymentcreditcards\":[],\"paymenttransfers\":[]}",
        "transflag": 50,
        "branch": { "code": "0001", "names": [{ "code": "en", "name": "BranchTest" }] },
        "custcode": "c01",
        "custnames": names("ลูกค้าทดสอบ")
    }))
    .unwrap();

    let payment = parse_transaction_to_payment(&doc).unwrap();

    assert_eq!(payment.branchcode, "0001");
    assert_eq!(payment.branchnames[0].code.as_deref(), Some("en"));
    assert_eq!(payment.branchnames[0].name.as_deref(), Some("BranchTest"));
    assert_eq!(payment.transflag, 50);
    assert_eq!(payment.custcode, "c01");
    assert_eq!(payment.custnames[0].name.as_deref(), Some("ลูกค้าทดสอบ"));
    assert_eq!(payment.totalpaycash, 1.0);
    assert!(payment.details.is_empty());
}

#[test]
fn test_payment_falls_back_to_structured_detail() {
    let mut doc = sale_invoice_json();
    doc["paymentdetailraw"] = json!("[]");
    doc["paycashamount"] = json!(145);

    let payment = PaymentPhaser::paid()
        .phase_single_doc(&doc.to_string())
        .unwrap();

    assert_eq!(payment.paycashamount, 145.0);
    assert_eq!(payment.totalpaycash, 500.0);
    assert_eq!(payment.totalpaycredit, 1000.0);
    assert_eq!(payment.totalpaytransfer, 500.0);

    let lines: Vec<(i32, i16, f64)> = payment
        .details
        .iter()
        .map(|d| (d.linenumber, d.paymenttype, d.amount))
        .collect();
    assert_eq!(lines, vec![(0, 1, 700.0), (1, 1, 300.0), (2, 2, 500.0)]);
    assert_eq!(payment.details[2].bankcode, "KBANK");
}

#[test]
fn test_payment_raw_detail_takes_precedence() {
    let mut doc = sale_invoice_json();
    doc["paymentdetailraw"] = json!(
        r#"{"cashamount":20,"paymenttransfers":[{"bankcode":"SCB","amount":80}]}"#
    );

    let payment = parse_transaction_to_payment(&serde_json::from_value(doc).unwrap()).unwrap();

    assert_eq!(payment.totalpaycash, 20.0);
    assert_eq!(payment.totalpaycredit, 0.0);
    assert_eq!(payment.totalpaytransfer, 80.0);
    assert_eq!(payment.details.len(), 1);
    assert_eq!(payment.details[0].bankcode, "SCB");
}

#[test]
fn test_payment_malformed_raw_is_convert_error() {
    let mut doc = sale_invoice_json();
    doc["paymentdetailraw"] = json!("{broken");

    let err = PaymentPhaser::pay()
        .phase_single_doc(&doc.to_string())
        .unwrap_err();
    assert!(err.to_string().starts_with("Error on Convert Pay : "));
}

#[test]
fn test_pay_bulk_decodes_array() {
    let docs = json!([sale_invoice_json(), stock_balance_json()]);
    let payments = PaymentPhaser::pay()
        .phase_multiple_doc(&docs.to_string())
        .unwrap();

    assert_eq!(payments.len(), 2);
    assert_eq!(payments[1].docno, "SB2023070100001");
}

#[test]
fn test_effects_follow_inquiry_type() {
    let mut doc: TransactionDocument = serde_json::from_value(sale_invoice_json()).unwrap();
    let sale = SaleTransactionPhaser::sale_invoice().phase_doc(&doc).unwrap();
    assert!(has_party_effect(&sale.header));
    assert!(!has_payment_effect(&doc));

    doc.inquirytype = 1;
    let sale = SaleTransactionPhaser::sale_invoice().phase_doc(&doc).unwrap();
    assert!(!has_party_effect(&sale.header));
    assert!(has_payment_effect(&doc));
}

fn stock_move_json(
    docno: &str,
    transflag: i16,
    docdatetime: &str,
    lines: Vec<serde_json::Value>,
) -> serde_json::Value {
    json!({
        "shopid": "2PrIIqTWxoBXv16K310sNwfHmfY",
        "guidfixed": "2QoOKOZ7Bv8dSUv38VTkkS2AZ0J",
        "docno": docno,
        "docdatetime": docdatetime,
        "guidref": "665f61bf-a49a-420b-9140-9824a704ef15",
        "transflag": transflag,
        "docrefdate": "2023-06-06T01:36:47.000Z",
        "taxdocdate": "2023-05-31T17:00:00Z",
        "vatrate": 7,
        "custnames": [],
        "totalvalue": 12,
        "totalbeforevat": 12,
        "totalvatvalue": 0.84,
        "totalaftervat": 12.84,
        "totalamount": 12.84,
        "branch": { "code": "branch01", "names": names("สาขาที่ 1") },
        "details": lines,
        "paymentdetail": {
            "cashamounttext": "",
            "cashamount": 0,
            "paymentcreditcards": [],
            "paymenttransfers": []
        },
        "paymentdetailraw": ""
    })
}

fn debtor_payment_json() -> serde_json::Value {
    let bill = |docno: &str, docdatetime: &str, value: f64, paid: f64| {
        json!({
            "selected": false,
            "docno": docno,
            "docdatetime": docdatetime,
            "transflag": 44,
            "value": value,
            "balance": value,
            "paymentamount": paid
        })
    };
    json!({
        "shopid": "2IZS0jFeRXWPidSupyXN7zQIlaS",
        "guidfixed": "2UIExOige65Ekkq6O2nj7F6BEez",
        "docno": "EE2023062200001",
        "docdatetime": "2023-06-22T06:48:15.000Z",
        "doctype": 1,
        "transflag": 50,
        "branch": { "code": "branch01", "names": names("สาขาที่ 1") },
        "custcode": "AR001",
        "custnames": names("ลูกค้าทั่วไป"),
        "totalpaymentamount": 70,
        "totalamount": 70,
        "totalbalance": 348,
        "totalvalue": 348,
        "details": [
            bill("PO2305041636C27E", "2023-05-04T09:36:14.014Z", 80.0, 50.0),
            bill("PO23052116545F75", "1480-05-21T10:11:56Z", 60.0, 60.0),
            bill("SI2023061900001", "2023-06-19T04:26:37.061Z", 70.0, 70.0)
        ],
        "paymentdetail": {
            "cashamounttext": "",
            "cashamount": 15,
            "paymentcreditcards": [{
                "docdatetime": "2023-06-22T09:37:42.468Z",
                "cardnumber": "456456",
                "amount": 30,
                "totalnetworth": 30
            }],
            "paymenttransfers": [{
                "docdatetime": "2023-06-22T09:37:47.774Z",
                "bankcode": "SCB",
                "banknames": names("ธ.ไทยพาณิชย์"),
                "accountnumber": "987654321",
                "amount": 25
            }]
        }
    })
}

fn assert_single_and_bulk_agree<P>(phaser: &P, doc: &serde_json::Value)
where
    P: TransactionPhaser,
    P::Record: std::fmt::Debug + PartialEq,
{
    let single = phaser.phase_single_doc(&doc.to_string()).unwrap();
    let multiple = phaser
        .phase_multiple_doc(&json!([doc]).to_string())
        .unwrap();

    assert_eq!(multiple.len(), 1, "{}", phaser.doc_name());
    assert_eq!(single, multiple[0], "{}", phaser.doc_name());
}

fn assert_stable_over_reserialization<P>(phaser: &P, doc: &serde_json::Value)
where
    P: TransactionPhaser,
    P::Record: std::fmt::Debug + PartialEq,
{
    let msg = doc.to_string();
    let first = phaser.phase_single_doc(&msg).unwrap();
    let decoded: TransactionDocument = serde_json::from_str(&msg).unwrap();
    let second = phaser
        .phase_single_doc(&serde_json::to_string(&decoded).unwrap())
        .unwrap();

    assert_eq!(first, second, "{}", phaser.doc_name());
}

#[test]
fn test_every_document_phaser_is_consistent() {
    let sale = sale_invoice_json();
    let stock = stock_adjustment_json();

    for phaser in [
        SaleTransactionPhaser::sale_invoice(),
        SaleTransactionPhaser::sale_invoice_return(),
    ] {
        assert_single_and_bulk_agree(&phaser, &sale);
        assert_stable_over_reserialization(&phaser, &sale);
    }

    for phaser in [
        PurchaseTransactionPhaser::purchase(),
        PurchaseTransactionPhaser::purchase_return(),
    ] {
        assert_single_and_bulk_agree(&phaser, &sale);
        assert_stable_over_reserialization(&phaser, &sale);
    }

    for phaser in [
        InventoryTransactionPhaser::stock_adjustment(),
        InventoryTransactionPhaser::stock_balance(),
        InventoryTransactionPhaser::stock_pickup(),
        InventoryTransactionPhaser::stock_receive(),
        InventoryTransactionPhaser::stock_return(),
        InventoryTransactionPhaser::stock_transfer(),
    ] {
        assert_single_and_bulk_agree(&phaser, &stock);
        assert_stable_over_reserialization(&phaser, &stock);
    }
}

#[test]
fn test_payment_phasers_are_consistent() {
    let doc = sale_invoice_json();

    for phaser in [PaymentPhaser::pay(), PaymentPhaser::paid()] {
        let single = phaser.phase_single_doc(&doc.to_string()).unwrap();
        let multiple = phaser
            .phase_multiple_doc(&json!([doc]).to_string())
            .unwrap();
        assert_eq!(vec![single.clone()], multiple);

        let decoded: TransactionDocument = serde_json::from_value(doc.clone()).unwrap();
        let again = phaser
            .phase_single_doc(&serde_json::to_string(&decoded).unwrap())
            .unwrap();
        assert_eq!(single, again);
    }

    let phaser = DebtorPaymentTransactionPhaser;
    let doc = debtor_payment_json();
    let single = phaser.phase_single_doc(&doc.to_string()).unwrap();
    let multiple = phaser
        .phase_multiple_doc(&json!([doc]).to_string())
        .unwrap();
    assert_eq!(vec![single.clone()], multiple);

    let decoded: crate::models::DebtorPaymentDocument =
        serde_json::from_value(doc.clone()).unwrap();
    let again = phaser
        .phase_single_doc(&serde_json::to_string(&decoded).unwrap())
        .unwrap();
    assert_eq!(single, again);
}

#[test]
fn test_stock_receive_fixture() {
    let mut line = detail(0, "BARCODE001", 1.0, 1);
    line["docdatetime"] = json!("2023-06-06T01:40:28.334Z");
    line["docrefdatetime"] = json!("2023-06-06T01:40:28.000Z");
    line["sumamount"] = json!(12);
    line["sumamountexcludevat"] = json!(12);
    line["priceexcludevat"] = json!(12);
    line["totalvaluevat"] = json!(0.84);
    let doc = stock_move_json("IF2023060100001", 60, "2023-06-01T01:52:44.000Z", vec![line]);

    let receive = InventoryTransactionPhaser::stock_receive()
        .phase_single_doc(&doc.to_string())
        .unwrap();

    let h = &receive.header;
    assert_eq!(h.shopid, "2PrIIqTWxoBXv16K310sNwfHmfY");
    assert_eq!(h.guidfixed, "2QoOKOZ7Bv8dSUv38VTkkS2AZ0J");
    assert_eq!(h.transflag, 60);
    assert_eq!(h.docdate, Utc.with_ymd_and_hms(2023, 6, 1, 1, 52, 44).unwrap());
    assert_eq!(h.guidref, "665f61bf-a49a-420b-9140-9824a704ef15");
    assert_eq!(h.docrefdate, Utc.with_ymd_and_hms(2023, 6, 6, 1, 36, 47).unwrap());
    assert_eq!(h.taxdocdate, Utc.with_ymd_and_hms(2023, 5, 31, 17, 0, 0).unwrap());
    assert_eq!(h.vatrate, 7.0);
    assert_eq!(h.totalvatvalue, 0.84);
    assert_eq!(h.totalamount, 12.84);
    assert_eq!(h.branchnames, vec![NameX::new("th", "สาขาที่ 1")]);

    let item = &receive.items[0];
    assert_eq!(item.docno, "IF2023060100001");
    assert_eq!(item.barcode, "BARCODE001");
    assert_eq!(item.unitcode, "ENV");
    assert_eq!(item.qty, 1.0);
    assert_eq!(item.price, 12.0);
    assert_eq!(item.totalvaluevat, 0.84);
    assert_eq!(item.whcode, "00000");
    assert_eq!(
        item.docrefdatetime,
        Utc.with_ymd_and_hms(2023, 6, 6, 1, 40, 28).unwrap()
    );

    let stock = StockTransactionPhaser::stock_receive().phase(&receive);
    assert_eq!(stock.transflag, 60);
    assert_eq!(stock.details[0].calcflag, 1);
}

#[test]
fn test_stock_return_fixture() {
    let mut line = detail(0, "BARCODE015", 5.0, -1);
    line["docref"] = json!("PO23051516490133");
    line["unitcode"] = json!("PCE");
    line["price"] = json!(0);
    line["sumamount"] = json!(0);
    let doc = stock_move_json("IR2023062600001", 58, "2023-06-26T07:54:41.000Z", vec![line]);

    let ret = InventoryTransactionPhaser::stock_return()
        .phase_single_doc(&doc.to_string())
        .unwrap();

    assert_eq!(ret.header.transflag, 58);
    assert_eq!(ret.header.docno, "IR2023062600001");
    assert_eq!(ret.items[0].docref, "PO23051516490133");
    assert_eq!(ret.items[0].qty, 5.0);

    let stock = StockTransactionPhaser::stock_return().phase(&ret);
    assert_eq!(stock.details[0].calcflag, -1);
    assert_eq!(stock.details[0].barcode, "BARCODE015");
}

#[test]
fn test_stock_transfer_fixture() {
    let mut out = detail(0, "BARCODE015", 5.0, -1);
    out["docrefdatetime"] = json!("0001-01-01T00:00:00Z");
    out["towhcode"] = json!("00001");
    let mut into = detail(0, "BARCODE015", 5.0, 1);
    into["docrefdatetime"] = json!("0001-01-01T00:00:00Z");
    into["whcode"] = json!("00001");
    into["towhcode"] = json!("");
    let doc = stock_move_json(
        "PO2305201653B6B0",
        72,
        "1480-05-20T10:10:56.000Z",
        vec![out, into],
    );

    let transfer = InventoryTransactionPhaser::stock_transfer()
        .phase_single_doc(&doc.to_string())
        .unwrap();

    assert_eq!(transfer.header.transflag, 72);
    assert_eq!(
        transfer.header.docdate,
        Utc.with_ymd_and_hms(1480, 5, 20, 10, 10, 56).unwrap()
    );
    assert_eq!(transfer.items.len(), 2);
    assert_eq!(transfer.items[0].whcode, "00000");
    assert_eq!(transfer.items[0].whcodedestination, "00001");
    assert_eq!(transfer.items[1].whcode, "00001");
    assert_eq!(
        transfer.items[0].docrefdatetime,
        Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap()
    );

    let stock = StockTransactionPhaser::stock_transfer().phase(&transfer);
    let moves: Vec<(&str, i16)> = stock
        .details
        .iter()
        .map(|d| (d.whcode.as_str(), d.calcflag))
        .collect();
    assert_eq!(moves, vec![("00000", -1), ("00001", 1)]);
}

#[test]
fn test_debtor_payment_fixture() {
    let payment = DebtorPaymentTransactionPhaser
        .phase_single_doc(&debtor_payment_json().to_string())
        .unwrap();

    assert_eq!(payment.guidfixed, "2UIExOige65Ekkq6O2nj7F6BEez");
    assert_eq!(payment.shopid, "2IZS0jFeRXWPidSupyXN7zQIlaS");
    assert_eq!(payment.docno, "EE2023062200001");
    assert_eq!(
        payment.docdate,
        Utc.with_ymd_and_hms(2023, 6, 22, 6, 48, 15).unwrap()
    );
    assert_eq!(payment.debtorcode, "AR001");
    assert_eq!(payment.branchcode, "branch01");
    assert_eq!(payment.totalamount, 70.0);
    assert_eq!(payment.totalpaycash, 15.0);
    assert_eq!(payment.totalpaytransfer, 25.0);
    assert_eq!(payment.totalpaycredit, 30.0);

    assert_eq!(payment.details.len(), 3);
    let bill = &payment.details[0];
    assert_eq!(bill.docno, "EE2023062200001");
    assert_eq!(bill.shopid, "2IZS0jFeRXWPidSupyXN7zQIlaS");
    assert_eq!(bill.linenumber, 0);
    assert_eq!(bill.billingno, "PO2305041636C27E");
    assert_eq!(bill.billtype, 44);
    assert_eq!(bill.billamount, 80.0);
    assert_eq!(bill.balanceamount, 80.0);
    assert_eq!(bill.payamount, 50.0);
    assert_eq!(payment.details[2].linenumber, 2);
}

#[test]
fn test_debtor_payment_without_bills() {
    let mut doc = debtor_payment_json();
    doc.as_object_mut().unwrap().remove("details");
    doc["paymentdetailraw"] = json!(r#"{"cashamount":70}"#);

    let payment = DebtorPaymentTransactionPhaser
        .phase_single_doc(&doc.to_string())
        .unwrap();

    assert!(payment.details.is_empty());
    assert_eq!(payment.totalpaycash, 70.0);
    assert_eq!(payment.totalpaycredit, 0.0);
}

#[test]
fn test_debtor_payment_malformed_is_decode_error() {
    let err = DebtorPaymentTransactionPhaser
        .phase_single_doc("[1, 2")
        .unwrap_err();
    assert!(err.is_decode());
    assert!(err
        .to_string()
        .starts_with("Cannot Unmarshal Debtor Payment Message : "));
}
