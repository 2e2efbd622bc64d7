mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] and [`Display`](std::fmt::Display) traits for the given struct.
///
/// The information of the error is customized using the `error` attribute:
/// ```
/// use tutor_attrs::ErrorKind;
/// use tutor_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(code = "parse-error", message = "unexpected end of input", labels = ["add something here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                   |
/// | --------- | ----------------------------------------------------------------------------- |
/// | `code`    | The stable code reported to collaborators, such as `"parse-error"`. Required. |
/// | `message` | The message displayed at the top of the error, also used for `Display`.       |
/// | `labels`  | An iterable of label texts, one per span of the error, in order.              |
/// | `help`    | Optional help text, describing what the user can do to fix the error.         |
///
/// `message`, `labels`, and `help` accept arbitrary expressions; the fields of the struct can be
/// read through `self`.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    quote! { #target }.into()
}
