pub mod hyprace;
