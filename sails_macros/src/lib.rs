use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, Ident, ItemFn, LitStr, Token};

/// Parses the arguments for the #[sails_sdk::timed] attribute.
struct TimedArgs {
    /// Optional label to log instead of the function name.
    label: Option<LitStr>,
}

impl Parse for TimedArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut label = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if key == "label" || key == "name" {
                let lit: LitStr = input.parse()?;
                label = Some(lit);
            } else {
                let _skip: syn::Expr = input.parse()?;
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(TimedArgs { label })
    }
}

/// Wraps a function body in a profiler scope, logging the elapsed time
/// when the function returns.
#[proc_macro_attribute]
pub fn timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TimedArgs);
    let func = parse_macro_input!(item as ItemFn);

    timed_impl(args, func).into()
}

// Non-proc-macro version that can be tested
fn timed_impl(args: TimedArgs, func: ItemFn) -> proc_macro2::TokenStream {
    let attrs = &func.attrs;
    let vis = &func.vis;
    let sig = &func.sig;
    let block = &func.block;
    let func_name = &sig.ident;

    let label = match &args.label {
        Some(lit) => quote! { #lit },
        None => quote! { stringify!(#func_name) },
    };

    quote! {
        #(#attrs)*
        #vis #sig {
            let __sails_timer = ::sails_sdk::profiling::ScopeTimer::new(#label);
            #block
        }
    }
}
