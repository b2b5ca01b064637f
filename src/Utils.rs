/// Loading of reaction tasks from JSON files and running them: parse, balance, simulate, save
pub mod load_from_file;
/// simplelog setup used by the binary
pub mod logger;
