use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    db::initialize,
    transaction::{Transaction, create_transaction},
};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

/// Two transactions in March 2023 and one on the first of April 2023.
pub(crate) fn insert_sample_transactions(connection: &Connection) {
    let builders = [
        Transaction::build("cheap thing", 50.0, datetime!(2023-03-05 0:00 UTC))
            .description("costs fifty")
            .category("A")
            .sold(true),
        Transaction::build("mid thing", 150.0, datetime!(2023-03-20 0:00 UTC))
            .description("costs one fifty")
            .category("B")
            .sold(false),
        Transaction::build("pricey thing", 950.0, datetime!(2023-04-01 0:00 UTC))
            .description("costs nine fifty")
            .category("A")
            .sold(true),
    ];

    for builder in builders {
        create_transaction(builder, connection).unwrap();
    }
}
