mod header;
mod send;
mod transfers;
