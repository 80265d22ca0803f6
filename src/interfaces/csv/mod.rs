pub mod payload_reader;
pub mod report_writer;
