//! Repository behavior against a temporary SQLite database.
//!
//! Exercises the db layer directly: serial assignment, uniqueness probes,
//! range queries and aggregates, without the HTTP stack on top.

use ledger_server::db::DbService;
use ledger_server::db::repository::{customer, item, staff, txn};
use shared::models::{CustomerCreate, ItemCreate, TransactionCreate, TransactionLineCreate};

async fn test_db() -> (DbService, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ledger.db");
    let db = DbService::new(path.to_str().expect("utf8 path"))
        .await
        .expect("open database");
    (db, dir)
}

fn new_customer(name: &str, mobile: &str) -> CustomerCreate {
    CustomerCreate {
        name: name.into(),
        mobile: mobile.into(),
        address: None,
    }
}

#[tokio::test]
async fn serial_numbers_start_at_one_and_increment() {
    let (db, _dir) = test_db().await;

    let a = customer::create(&db.pool, new_customer("A", "9000000001"))
        .await
        .unwrap();
    let b = customer::create(&db.pool, new_customer("B", "9000000002"))
        .await
        .unwrap();
    assert_eq!(a.serial_number, 1);
    assert_eq!(b.serial_number, 2);

    // The initial portal password is the mobile number
    assert!(a.verify_password("9000000001").unwrap());
    assert!(!a.verify_password("9000000002").unwrap());
}

#[tokio::test]
async fn mobile_taken_ignores_the_customer_itself() {
    let (db, _dir) = test_db().await;

    let a = customer::create(&db.pool, new_customer("A", "9000000001"))
        .await
        .unwrap();
    customer::create(&db.pool, new_customer("B", "9000000002"))
        .await
        .unwrap();

    assert!(customer::mobile_taken(&db.pool, "9000000001", None).await.unwrap());
    // Updating A to its own mobile is not a conflict
    assert!(
        !customer::mobile_taken(&db.pool, "9000000001", Some(a.id))
            .await
            .unwrap()
    );
    // But taking B's mobile is
    assert!(
        customer::mobile_taken(&db.pool, "9000000002", Some(a.id))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn transaction_totals_and_aggregates() {
    let (db, _dir) = test_db().await;

    let admin = staff::create(&db.pool, "admin", "Administrator", "admin", "admin123")
        .await
        .unwrap();
    let cust = customer::create(&db.pool, new_customer("A", "9000000001"))
        .await
        .unwrap();
    let catalog_item = item::create(
        &db.pool,
        ItemCreate {
            name: "Supari Mix".into(),
            price: 120.5,
            description: None,
            is_active: true,
        },
        "",
    )
    .await
    .unwrap();

    // Two lines of the same catalog item plus a custom line
    let created = txn::create(
        &db.pool,
        TransactionCreate {
            customer_id: cust.id,
            items: vec![
                TransactionLineCreate {
                    item_id: Some(catalog_item.id),
                    name: "Supari Mix".into(),
                    price: 120.5,
                    quantity: 2,
                    is_custom: false,
                },
                TransactionLineCreate {
                    item_id: None,
                    name: "Gift wrap".into(),
                    price: 10.0,
                    quantity: 1,
                    is_custom: true,
                },
            ],
            advance_payment: 100.0,
        },
        admin.id,
    )
    .await
    .unwrap();

    assert_eq!(created.total_amount, 251.0);
    assert_eq!(created.remaining_amount, 151.0);
    assert_eq!(created.items.len(), 2);

    // One more advance-only transaction
    txn::create(
        &db.pool,
        TransactionCreate {
            customer_id: cust.id,
            items: vec![],
            advance_payment: 300.0,
        },
        admin.id,
    )
    .await
    .unwrap();

    // The item is referenced by one transaction, not two (same txn twice)
    assert_eq!(txn::count_by_item(&db.pool, catalog_item.id).await.unwrap(), 1);
    assert_eq!(txn::count_by_customer(&db.pool, cust.id).await.unwrap(), 2);

    let summary = txn::account_summary(&db.pool, cust.id).await.unwrap();
    assert_eq!(summary.total_transactions, 2);
    assert_eq!(summary.total_amount, 251.0);
    assert_eq!(summary.total_advance, 400.0);
    assert_eq!(summary.outstanding_amount, -149.0);
}

#[tokio::test]
async fn range_query_bounds_are_inclusive() {
    let (db, _dir) = test_db().await;

    let admin = staff::create(&db.pool, "admin", "Administrator", "admin", "admin123")
        .await
        .unwrap();
    let cust = customer::create(&db.pool, new_customer("A", "9000000001"))
        .await
        .unwrap();
    let created = txn::create(
        &db.pool,
        TransactionCreate {
            customer_id: cust.id,
            items: vec![],
            advance_payment: 50.0,
        },
        admin.id,
    )
    .await
    .unwrap();

    // A range ending exactly at created_at still includes the row
    let rows = txn::find_by_customer_in_range(&db.pool, cust.id, 0, created.created_at)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let rows = txn::find_by_customer_in_range(
        &db.pool,
        cust.id,
        created.created_at,
        created.created_at,
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);

    // A range strictly after it does not
    let rows = txn::find_by_customer_in_range(
        &db.pool,
        cust.id,
        created.created_at + 1,
        created.created_at + 1000,
    )
    .await
    .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn search_matches_serial_exactly_and_text_by_substring() {
    let (db, _dir) = test_db().await;

    customer::create(&db.pool, new_customer("Amit Kumar", "9000000001"))
        .await
        .unwrap();
    customer::create(&db.pool, new_customer("Amita Devi", "9000000002"))
        .await
        .unwrap();

    let by_serial = customer::search(&db.pool, "1").await.unwrap();
    assert_eq!(by_serial.len(), 1);
    assert_eq!(by_serial[0].name, "Amit Kumar");

    let by_name = customer::search(&db.pool, "amit").await.unwrap();
    assert_eq!(by_name.len(), 2);

    // Numeric input is always a serial lookup, never a mobile substring:
    // a partial mobile number finds nothing
    assert!(customer::search(&db.pool, "9000").await.unwrap().is_empty());

    let by_surname = customer::search(&db.pool, "Devi").await.unwrap();
    assert_eq!(by_surname.len(), 1);
    assert_eq!(by_surname[0].mobile, "9000000002");

    assert!(customer::search(&db.pool, "nobody").await.unwrap().is_empty());
}
