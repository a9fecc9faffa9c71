mod source;
mod worker;
