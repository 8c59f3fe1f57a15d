//! Procedural macros for slackmod.
//!
//! This crate provides:
//!
//! - `#[slack_handlers]` - Turns an impl block with tagged async methods into a
//!   `Component` implementation
//!
//! Writing the `Handlers` builder by hand is equivalent; the attribute only
//! saves the boilerplate.
//!
//! ```rust,ignore
//! use slackmod::prelude::*;
//!
//! struct Greeter;
//!
//! #[slack_handlers]
//! impl Greeter {
//!     #[message("hello")]
//!     async fn on_hello(&self, cx: Arc<SlackContext>) {
//!         cx.say("hi there");
//!     }
//!
//!     #[command("/deploy")]
//!     #[shortcut("deploy_shortcut")]
//!     async fn on_deploy(&self, cx: Arc<SlackContext>) {
//!         cx.ack(None);
//!     }
//!
//!     #[middleware]
//!     async fn audit(&self, cx: Arc<SlackContext>, next: Next) -> HandlerResult {
//!         next.run(cx).await
//!     }
//! }
//! ```

mod handlers;

use proc_macro::TokenStream;
use syn::{ItemImpl, LitStr, parse_macro_input};

/// Generates a `Component` implementation from tagged methods.
///
/// # Attributes
///
/// - `#[slack_handlers]` - Component name defaults to the type name
/// - `#[slack_handlers(name = "...")]` - Overrides the component name
///
/// # Method tags
///
/// `message`, `action`, `command`, `event`, `shortcut` and `view` accept no
/// argument (match everything of that kind), a string literal (exact match) or
/// `pattern = "..."` (regular expression). `middleware` takes no argument.
///
/// A method may carry several tags. Repeating the same tag keeps only the last
/// one.
#[proc_macro_attribute]
pub fn slack_handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name: Option<LitStr> = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported slack_handlers argument, expected `name`"))
        }
    });
    parse_macro_input!(attr with parser);
    let item = parse_macro_input!(item as ItemImpl);

    match handlers::slack_handlers(name, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
