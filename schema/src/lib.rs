pub mod books;
pub mod borrows;
