//! Transaction records and the queries for storing and retrieving them.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and counting transactions

use rusqlite::{Connection, Row, functions::FunctionFlags, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::DatabaseId, month_range::MonthRange};

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether it has been sold.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold, or listed for sale.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            date_of_sale: date_of_sale.to_offset(UtcOffset::UTC),
            category: String::new(),
            sold: false,
            import_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```rust
/// use time::macros::datetime;
///
/// use sales_report::transaction::Transaction;
///
/// let builder = Transaction::build("Fjallraven Backpack", 329.85, datetime!(2023-03-05 10:00 UTC))
///     .description("Fits 15 inch laptops")
///     .category("men's clothing")
///     .sold(true);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The name of the product.
    pub title: String,

    /// A text description of the product. Defaults to an empty string.
    pub description: String,

    /// The listed price of the product.
    pub price: f64,

    /// When the product was sold, normalized to UTC.
    pub date_of_sale: OffsetDateTime,

    /// The product category. Defaults to an empty string.
    pub category: String,

    /// Whether the product has been sold. Defaults to `false`.
    pub sold: bool,

    /// Optional unique identifier for imported transactions.
    ///
    /// Seed records get a hash of their content so that importing the same
    /// dataset twice does not create duplicates.
    ///
    /// - `Some(id)` - Transaction was imported from seed data
    /// - `None` - Transaction was created directly
    pub import_id: Option<i64>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product has been sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the import ID for the transaction.
    pub fn import_id(mut self, import_id: Option<i64>) -> Self {
        self.import_id = import_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, price, date_of_sale, category, sold FROM \"transaction\"";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error,
/// including a duplicate import ID.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (title, description, price, date_of_sale, category, sold, import_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, title, description, price, date_of_sale, category, sold",
        )?
        .query_row(
            (
                builder.title,
                builder.description,
                builder.price,
                builder.date_of_sale.unix_timestamp(),
                builder.category,
                builder.sold,
                builder.import_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Import many transactions in a single database transaction.
///
/// Either every new transaction is stored or none are. Transactions with
/// import IDs that already exist in the database are skipped.
///
/// Returns the number of transactions that were inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn import_transactions(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;
    let mut inserted_count = 0;

    // Prepare the insert statement once for reuse
    let mut stmt = tx.prepare(
        "INSERT INTO \"transaction\" (title, description, price, date_of_sale, category, sold, import_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(import_id) DO NOTHING",
    )?;

    for builder in builders {
        inserted_count += stmt.execute((
            builder.title,
            builder.description,
            builder.price,
            builder.date_of_sale.unix_timestamp(),
            builder.category,
            builder.sold,
            builder.import_id,
        ))?;
    }

    drop(stmt);

    tx.commit()?;
    Ok(inserted_count)
}

/// Defines how transactions should be fetched from [query_transactions].
#[derive(Debug, Default)]
pub struct TransactionQuery {
    /// Include transactions sold within `date_range`.
    pub date_range: Option<MonthRange>,
    /// Include transactions whose title, description or price contains this
    /// text, ignoring case. An empty string matches everything.
    ///
    /// The connection must have [register_search_functions] applied.
    pub search: Option<String>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Ignore the first N transactions. Only has an effect if `limit` is not `None`.
    pub offset: u64,
}

/// Query for transactions in the database.
///
/// Transactions are returned in the order they were inserted.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidPagination] if `limit` or `offset` is larger than SQLite can take,
/// - [Error::SqlError] if there is a SQL error.
pub fn query_transactions(
    filter: TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query_string_parts = vec![SELECT_COLUMNS.to_string()];
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(date_range) = filter.date_range {
        where_clause_parts.push(format!(
            "date_of_sale >= ?{} AND date_of_sale < ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        ));
        query_parameters.push(Value::Integer(date_range.start.unix_timestamp()));
        query_parameters.push(Value::Integer(date_range.end.unix_timestamp()));
    }

    if let Some(search) = filter.search.filter(|search| !search.is_empty()) {
        let param = query_parameters.len() + 1;
        where_clause_parts.push(format!(
            "({CONTAINS_IGNORE_CASE}(title, ?{param}) \
             OR {CONTAINS_IGNORE_CASE}(description, ?{param}) \
             OR {CONTAINS_IGNORE_CASE}(CAST(price AS TEXT), ?{param}))"
        ));
        query_parameters.push(Value::Text(search));
    }

    if !where_clause_parts.is_empty() {
        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
    }

    query_string_parts.push("ORDER BY id ASC".to_string());

    if let Some(limit) = filter.limit {
        query_string_parts.push(format!(
            "LIMIT ?{} OFFSET ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        ));
        query_parameters.push(Value::Integer(
            i64::try_from(limit).map_err(|_| Error::InvalidPagination)?,
        ));
        query_parameters.push(Value::Integer(
            i64::try_from(filter.offset).map_err(|_| Error::InvalidPagination)?,
        ));
    }

    let query_string = query_string_parts.join(" ");
    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale INTEGER NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                import_id INTEGER UNIQUE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale)",
        (),
    )?;

    Ok(())
}

/// The SQL function registered by [register_search_functions].
const CONTAINS_IGNORE_CASE: &str = "contains_ignore_case";

/// Register `contains_ignore_case(haystack, needle)` on `connection`.
///
/// It is true when `haystack` contains `needle` as literal text, ignoring
/// case for all of Unicode rather than only ASCII like `LIKE`.
///
/// # Errors
/// Returns an error if SQLite rejects the function.
pub fn register_search_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        CONTAINS_IGNORE_CASE,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let haystack: String = context.get(0)?;
            let needle: String = context.get(1)?;

            Ok(contains_ignore_case(&haystack, &needle))
        },
    )
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let timestamp: i64 = row.get(4)?;
    let category = row.get(5)?;
    let sold = row.get(6)?;

    let date_of_sale = OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        date_of_sale,
        category,
        sold,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        month_range::resolve_month,
        transaction::{
            Transaction, TransactionQuery, contains_ignore_case, count_transactions,
            create_transaction, import_transactions, query_transactions,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let date_of_sale = datetime!(2023-03-05 10:30 UTC);

        let transaction = create_transaction(
            Transaction::build("Backpack", 109.95, date_of_sale)
                .description("Your perfect pack for everyday use")
                .category("men's clothing")
                .sold(true),
            &conn,
        )
        .unwrap();

        assert_eq!(
            transaction,
            Transaction {
                id: 1,
                title: "Backpack".to_owned(),
                description: "Your perfect pack for everyday use".to_owned(),
                price: 109.95,
                date_of_sale,
                category: "men's clothing".to_owned(),
                sold: true,
            }
        );
    }

    #[test]
    fn create_normalizes_date_to_utc() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build("Ring", 9.99, datetime!(2023-03-01 02:00 +05:30)),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.date_of_sale, datetime!(2023-02-28 20:30 UTC));
    }

    #[test]
    fn import_multiple() {
        let conn = get_test_connection();
        let builders = vec![
            Transaction::build("A", 1.0, datetime!(2023-01-01 0:00 UTC)).import_id(Some(1)),
            Transaction::build("B", 2.0, datetime!(2023-01-02 0:00 UTC)).import_id(Some(2)),
        ];

        let inserted = import_transactions(builders, &conn).unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn import_ignores_duplicate_import_id() {
        let conn = get_test_connection();
        let builders = vec![
            Transaction::build("A", 1.0, datetime!(2023-01-01 0:00 UTC)).import_id(Some(1)),
            Transaction::build("B", 2.0, datetime!(2023-01-02 0:00 UTC)).import_id(Some(2)),
        ];

        import_transactions(builders.clone(), &conn).unwrap();
        let inserted = import_transactions(builders, &conn).unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn import_is_all_or_nothing() {
        let conn = get_test_connection();
        conn.execute("DROP TABLE \"transaction\"", ()).unwrap();
        conn.execute(
            "CREATE TABLE \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (title != 'bad'),
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale INTEGER NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                import_id INTEGER UNIQUE
            )",
            (),
        )
        .unwrap();
        let builders = vec![
            Transaction::build("good", 1.0, datetime!(2023-01-01 0:00 UTC)),
            Transaction::build("bad", 2.0, datetime!(2023-01-02 0:00 UTC)),
        ];

        let result = import_transactions(builders, &conn);

        assert!(result.is_err());
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn query_filters_by_month() {
        let conn = get_test_connection();
        for date_of_sale in [
            datetime!(2023-02-28 23:59:59 UTC),
            datetime!(2023-03-01 0:00 UTC),
            datetime!(2023-03-31 23:59:59 UTC),
            datetime!(2023-04-01 0:00 UTC),
        ] {
            create_transaction(Transaction::build("item", 10.0, date_of_sale), &conn).unwrap();
        }

        let got = query_transactions(
            TransactionQuery {
                date_range: Some(resolve_month(3, 2023).unwrap()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let ids: Vec<_> = got.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn query_with_limit_and_offset() {
        let conn = get_test_connection();
        for i in 0..10 {
            create_transaction(
                Transaction::build(&format!("item {i}"), i as f64, datetime!(2023-03-05 0:00 UTC)),
                &conn,
            )
            .unwrap();
        }

        let got = query_transactions(
            TransactionQuery {
                limit: Some(3),
                offset: 4,
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let ids: Vec<_> = got.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, [5, 6, 7]);
    }

    #[test]
    fn search_ignores_case_in_title_and_description() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 0:00 UTC);
        create_transaction(Transaction::build("Mens Cotton Jacket", 55.99, date), &conn).unwrap();
        create_transaction(
            Transaction::build("Solid Gold Petite Micropave", 168.0, date)
                .description("Satisfaction Guaranteed. Return or exchange any order within 30 days."),
            &conn,
        )
        .unwrap();
        create_transaction(Transaction::build("SSD", 109.0, date), &conn).unwrap();

        let search = |text: &str| {
            query_transactions(
                TransactionQuery {
                    search: Some(text.to_owned()),
                    ..Default::default()
                },
                &conn,
            )
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>()
        };

        assert_eq!(search("jacket"), [1]);
        assert_eq!(search("RETURN OR EXCHANGE"), [2]);
        assert_eq!(search(""), [1, 2, 3]);
    }

    #[test]
    fn search_matches_price_as_text() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 0:00 UTC);
        create_transaction(Transaction::build("cheap", 50.0, date), &conn).unwrap();
        create_transaction(Transaction::build("mid", 150.0, date), &conn).unwrap();
        create_transaction(Transaction::build("pricey", 329.85, date), &conn).unwrap();

        let search = |text: &str| {
            query_transactions(
                TransactionQuery {
                    search: Some(text.to_owned()),
                    ..Default::default()
                },
                &conn,
            )
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.title)
            .collect::<Vec<_>>()
        };

        assert_eq!(search("150"), ["mid"]);
        assert_eq!(search("50"), ["cheap", "mid"]);
        assert_eq!(search("329.85"), ["pricey"]);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 0:00 UTC);
        create_transaction(Transaction::build("100% cotton", 20.0, date), &conn).unwrap();
        create_transaction(Transaction::build("polyester", 30.0, date), &conn).unwrap();

        let got = query_transactions(
            TransactionQuery {
                search: Some("%".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "100% cotton");
    }

    #[test]
    fn search_ignores_case_outside_ascii() {
        let conn = get_test_connection();
        let date = datetime!(2023-03-05 0:00 UTC);
        create_transaction(Transaction::build("Écran Pro", 249.0, date), &conn).unwrap();
        create_transaction(
            Transaction::build("Lamp", 19.0, date).description("ÜBERGROSSE Glühbirne"),
            &conn,
        )
        .unwrap();
        create_transaction(Transaction::build("Ecran Lite", 99.0, date), &conn).unwrap();

        let search = |text: &str| {
            query_transactions(
                TransactionQuery {
                    search: Some(text.to_owned()),
                    ..Default::default()
                },
                &conn,
            )
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.title)
            .collect::<Vec<_>>()
        };

        assert_eq!(search("écran"), ["Écran Pro"]);
        assert_eq!(search("übergrosse"), ["Lamp"]);
    }

    #[test]
    fn contains_ignore_case_is_literal() {
        assert!(contains_ignore_case("100% Cotton", "% cot"));
        assert!(contains_ignore_case("ÉCRAN", "écr"));
        assert!(!contains_ignore_case("polyester", "p%r"));
        assert!(!contains_ignore_case("a_b", "a%b"));
    }

    #[test]
    fn limit_and_offset_beyond_sqlite_integers_are_rejected() {
        let conn = get_test_connection();

        let huge_limit = query_transactions(
            TransactionQuery {
                limit: Some(u64::MAX),
                ..Default::default()
            },
            &conn,
        );
        let huge_offset = query_transactions(
            TransactionQuery {
                limit: Some(10),
                offset: u64::MAX,
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(huge_limit, Err(Error::InvalidPagination));
        assert_eq!(huge_offset, Err(Error::InvalidPagination));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want = 5;
        for i in 0..want {
            create_transaction(
                Transaction::build("item", i as f64, datetime!(2023-03-05 0:00 UTC)),
                &conn,
            )
            .unwrap();
        }

        assert_eq!(count_transactions(&conn).unwrap(), want);
    }
}
