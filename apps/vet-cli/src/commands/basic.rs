use anyhow::Result;
use clap::Args;
use vet::{Error, Errors, Validate, Validator, Walk};

#[derive(Args)]
pub struct BasicArgs {
    /// Title given to the single book in the order
    #[arg(long, default_value = "")]
    pub title: String,
    /// Author given to the single book in the order
    #[arg(long, default_value = "")]
    pub author: String,
}

#[derive(Walk)]
pub struct Order {
    #[vet(json = "books")]
    pub books: Vec<Option<Box<Book>>>,
}

#[derive(Walk)]
pub struct Book {
    #[vet(json = "title")]
    pub title: String,
    #[vet(json = "author")]
    pub author: String,
}

impl Validate for Book {
    fn validate(&self) -> Result<(), Errors> {
        let mut errs = Ok(());
        if self.title.is_empty() {
            errs = vet::append(errs, Err(Error::field("title", "is required")));
        }

        errs = vet::append(errs, vet::require_field("author", &self.author));

        errs
    }
}

pub fn run(validator: &Validator, args: BasicArgs) -> Result<()> {
    let order = Order {
        books: vec![Some(Box::new(Book {
            title: args.title,
            author: args.author,
        }))],
    };
    let failures = super::report(validator.validate(&order));
    tracing::debug!(failures, "basic order validated");
    Ok(())
}
