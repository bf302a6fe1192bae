#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("column `{column}` does not exist on table `{table}`")]
    UnknownColumn { table: &'static str, column: String },

    #[error("could not find a relationship between `{base}` and `{target}`")]
    UnrelatedTables {
        base: &'static str,
        target: &'static str,
    },
}
