pub mod testcase_reader;

pub use testcase_reader::TestCaseReader;
