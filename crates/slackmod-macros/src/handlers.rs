//! `#[slack_handlers]` implementation.
//!
//! The attribute goes on an inherent `impl` block. Methods inside it are
//! tagged with one or more handler attributes:
//!
//! | Attribute | Registers |
//! |-----------|-----------|
//! | `#[message]`, `#[message("hello")]`, `#[message(pattern = "^hi")]` | message listener |
//! | `#[action(..)]` | interactive action listener |
//! | `#[command(..)]` | slash command listener |
//! | `#[event(..)]` | Events API listener |
//! | `#[shortcut(..)]` | shortcut listener |
//! | `#[view(..)]` | view submission listener |
//! | `#[middleware]` | global middleware, never takes a matcher |
//!
//! The tags are stripped from the impl block, and an
//! `impl ::slackmod_core::Component` is generated whose `handlers` method
//! feeds every tagged method into a `::slackmod_core::Handlers` builder in
//! declaration order.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::parse::ParseStream;
use syn::{
    Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Token, Type, spanned::Spanned,
};

// ============================================================================
// Tags
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tag {
    Message,
    Action,
    Command,
    Event,
    Shortcut,
    View,
    Middleware,
}

impl Tag {
    const ALL: [(&'static str, Tag); 7] = [
        ("message", Tag::Message),
        ("action", Tag::Action),
        ("command", Tag::Command),
        ("event", Tag::Event),
        ("shortcut", Tag::Shortcut),
        ("view", Tag::View),
        ("middleware", Tag::Middleware),
    ];

    fn of(attr: &Attribute) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(name, _)| attr.path().is_ident(name))
            .map(|(_, tag)| *tag)
    }

    /// Name of the `Handlers` builder method for this tag.
    fn builder_method(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, tag)| *tag == self)
            .map(|(name, _)| *name)
            .unwrap_or("message")
    }
}

enum MatcherSpec {
    Exact(LitStr),
    Pattern(LitStr),
}

struct Tagged {
    tag: Tag,
    matcher: Option<MatcherSpec>,
    method: syn::Ident,
    takes_context: bool,
}

// ============================================================================
// Entry point
// ============================================================================

pub fn slack_handlers(name: Option<LitStr>, mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[slack_handlers] must be placed on an inherent impl block",
        ));
    }

    let name = match name {
        Some(name) => name,
        None => default_name(&item.self_ty).ok_or_else(|| {
            syn::Error::new(
                item.self_ty.span(),
                "cannot infer a component name, use #[slack_handlers(name = \"...\")]",
            )
        })?,
    };

    let mut tagged = Vec::new();
    let mut errors: Option<syn::Error> = None;
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        match collect_tags(method) {
            Ok(found) => tagged.extend(found),
            Err(e) => match errors.as_mut() {
                Some(all) => all.combine(e),
                None => errors = Some(e),
            },
        }
    }
    if let Some(e) = errors {
        return Err(e);
    }

    let calls = tagged.iter().map(builder_call);
    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics ::slackmod_core::Component for #self_ty #where_clause {
            fn component_name(&self) -> &'static str {
                #name
            }

            fn handlers(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::vec::Vec<::slackmod_core::HandlerDescriptor> {
                ::slackmod_core::Handlers::new(self, #name)
                    #(#calls)*
                    .build()
            }
        }
    })
}

fn default_name(ty: &Type) -> Option<LitStr> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    Some(LitStr::new(&segment.ident.to_string(), Span::call_site()))
}

// ============================================================================
// Method parsing
// ============================================================================

/// Removes the handler tags from `method` and returns what they declared.
fn collect_tags(method: &mut ImplItemFn) -> syn::Result<Vec<Tagged>> {
    let mut specs = Vec::new();
    for attr in &method.attrs {
        if let Some(tag) = Tag::of(attr) {
            specs.push((tag, parse_tag(attr, tag)?));
        }
    }
    if specs.is_empty() {
        return Ok(Vec::new());
    }
    method.attrs.retain(|attr| Tag::of(attr).is_none());

    let sig = &method.sig;
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "slack handler methods must be `async fn`",
        ));
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new(
                sig.ident.span(),
                "slack handler methods must take `&self`",
            ));
        }
    }

    let params = sig.inputs.len() - 1;
    let mut tagged = Vec::with_capacity(specs.len());
    for (tag, matcher) in specs {
        let takes_context = match (tag, params) {
            (Tag::Middleware, 2) => true,
            (Tag::Middleware, _) => {
                return Err(syn::Error::new(
                    sig.ident.span(),
                    "middleware methods take `(&self, cx: Arc<SlackContext>, next: Next)`",
                ));
            }
            (_, 0) => false,
            (_, 1) => true,
            _ => {
                return Err(syn::Error::new(
                    sig.ident.span(),
                    "listener methods take `&self` and at most one `Arc<SlackContext>`",
                ));
            }
        };
        tagged.push(Tagged {
            tag,
            matcher,
            method: sig.ident.clone(),
            takes_context,
        });
    }
    Ok(tagged)
}

fn parse_tag(attr: &Attribute, tag: Tag) -> syn::Result<Option<MatcherSpec>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(list) if tag == Tag::Middleware => Err(syn::Error::new(
            list.span(),
            "#[middleware] does not take a matcher",
        )),
        Meta::List(list) => list.parse_args_with(parse_matcher).map(Some),
        Meta::NameValue(nv) => Err(syn::Error::new(
            nv.span(),
            "expected `#[tag]`, `#[tag(\"...\")]` or `#[tag(pattern = \"...\")]`",
        )),
    }
}

fn parse_matcher(input: ParseStream) -> syn::Result<MatcherSpec> {
    if input.peek(LitStr) {
        return Ok(MatcherSpec::Exact(input.parse()?));
    }
    let key: syn::Ident = input.parse()?;
    input.parse::<Token![=]>()?;
    let value: LitStr = input.parse()?;
    match key.to_string().as_str() {
        "pattern" => Ok(MatcherSpec::Pattern(value)),
        "exact" => Ok(MatcherSpec::Exact(value)),
        other => Err(syn::Error::new(
            key.span(),
            format!("unknown matcher key `{other}`, expected `pattern` or `exact`"),
        )),
    }
}

// ============================================================================
// Code generation
// ============================================================================

fn builder_call(t: &Tagged) -> TokenStream {
    let method = &t.method;
    let method_name = method.to_string();

    if t.tag == Tag::Middleware {
        return quote! {
            .middleware(#method_name, |this, cx, next| async move {
                this.#method(cx, next).await
            })
        };
    }

    let builder = format_ident!("{}", t.tag.builder_method());
    let matcher = match &t.matcher {
        None => quote!(::std::option::Option::None),
        Some(MatcherSpec::Exact(lit)) => {
            quote!(::std::option::Option::Some(::slackmod_core::Matcher::exact(#lit)))
        }
        Some(MatcherSpec::Pattern(lit)) => {
            quote!(::std::option::Option::Some(::slackmod_core::Matcher::pattern(#lit)))
        }
    };
    let body = if t.takes_context {
        quote!(this.#method(cx).await)
    } else {
        quote!({
            let _ = cx;
            this.#method().await
        })
    };

    quote! {
        .#builder(#method_name, #matcher, |this, cx| async move { #body })
    }
}
