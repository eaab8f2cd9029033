pub mod sequence_writer;
