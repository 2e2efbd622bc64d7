use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Expr,
    Ident,
    ItemStruct,
    LitStr,
    Result,
    Token,
};

/// The arguments that can be passed to the `error` attribute.
#[derive(Debug, Default)]
pub struct ErrorArgs {
    pub code: Option<LitStr>,
    pub message: Option<Expr>,
    pub labels: Option<Expr>,
    pub help: Option<Expr>,
}

impl ErrorArgs {
    /// Parse the next argument in the input stream and applies it to itself.
    fn parse_arg(&mut self, input: ParseStream) -> Result<()> {
        let ident: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let ident_str = ident.to_string();
        match ident_str.as_str() {
            "code" => self.code = Some(input.parse()?),
            "message" => self.message = Some(input.parse()?),
            "labels" => self.labels = Some(input.parse()?),
            "help" => self.help = Some(input.parse()?),
            _ => return Err(syn::Error::new_spanned(ident, format!("unknown tag `{}`", ident_str))),
        }

        Ok(())
    }
}

impl Parse for ErrorArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ErrorArgs::default();

        while !input.is_empty() {
            args.parse_arg(input)?;
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// The target struct to derive `ErrorKind` for.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    pub error_args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        // documentation comments are attributes too, so find the `error` one
        let attributes = input.call(Attribute::parse_outer)?;
        let remaining = input.parse::<ItemStruct>()?;

        let mut error_args = None;
        for attr in &attributes {
            if attr.path().is_ident("error") {
                error_args = Some(attr.parse_args::<ErrorArgs>()?);
                break;
            }
        }

        let Some(error_args) = error_args else {
            return Err(syn::Error::new(
                remaining.ident.span(),
                "`ErrorKind` requires an `#[error(...)]` attribute",
            ));
        };
        if error_args.code.is_none() {
            return Err(syn::Error::new(remaining.ident.span(), "missing `code` tag"));
        }
        if error_args.message.is_none() {
            return Err(syn::Error::new(remaining.ident.span(), "missing `message` tag"));
        }

        Ok(ErrorKindTarget {
            name: remaining.ident,
            error_args,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let name = &self.name;
        let code = &self.error_args.code;
        let message = &self.error_args.message;
        let labels = self.error_args.labels
            .as_ref()
            .map(|labels| quote! { #labels })
            .unwrap_or_else(|| {
                let empty = LitStr::new("", Span::call_site());
                quote! { [#empty] }
            });
        let help = self.error_args.help.as_ref().map(|e| quote! { builder.set_help(#e); });

        tokens.extend(quote! {
            impl ErrorKind for #name {
                fn code(&self) -> &'static str {
                    #code
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[std::ops::Range<usize>],
                ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                    let span_at = |i: usize| {
                        spans.get(i)
                            .or_else(|| spans.last())
                            .cloned()
                            .unwrap_or(0..0)
                    };

                    let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, span_at(0).start)
                        .with_message(#message)
                        .with_labels(
                            #labels
                                .into_iter()
                                .enumerate()
                                .map(|(i, label_str)| {
                                    let mut label = ariadne::Label::new((src_id, span_at(i)))
                                        .with_color(tutor_error::EXPR);

                                    if !label_str.is_empty() {
                                        label = label.with_message(label_str);
                                    }

                                    label
                                })
                                .collect::<Vec<_>>()
                        );

                    #help
                    builder.finish()
                }
            }

            impl std::fmt::Display for #name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", #message)
                }
            }
        });
    }
}
