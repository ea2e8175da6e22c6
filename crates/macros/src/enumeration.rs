//! Enumeration derive macro implementation.

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Expr, Ident, LitStr, Path, Token, Type, parse_macro_input};

/// One entry of `#[elements(...)]`: a name and optional constructor arguments.
struct ElementDecl {
	ident: Ident,
	args: Option<Punctuated<Expr, Token![,]>>,
}

impl Parse for ElementDecl {
	fn parse(input: ParseStream) -> syn::Result<Self> {
		let ident = Ident::parse_any(input)?;
		let args = if input.peek(syn::token::Paren) {
			let content;
			syn::parenthesized!(content in input);
			Some(content.parse_terminated(Expr::parse, Token![,])?)
		} else {
			None
		};
		Ok(Self { ident, args })
	}
}

enum Kind {
	Final,
	Abstract,
}

#[derive(Default)]
struct Options {
	name: Option<LitStr>,
	kind: Option<Kind>,
	args: Option<Vec<Type>>,
	constructor: Option<Path>,
	serde: bool,
}

/// Entry point for `#[derive(Enumeration)]`.
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	match expand(&input) {
		Ok(tokens) => tokens.into(),
		Err(err) => err.to_compile_error().into(),
	}
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	let ty = &input.ident;
	let vis = &input.vis;

	if !matches!(input.data, Data::Struct(_)) {
		return Err(syn::Error::new_spanned(input, "Enumeration can only be derived for structs"));
	}
	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(&input.generics, "Enumeration cannot be derived for generic types"));
	}

	let options = parse_options(input)?;
	let elements = parse_elements(input)?;
	check_elements(&elements, options.args.as_deref())?;

	let name = match &options.name {
		Some(lit) => lit.value(),
		None => ty.unraw().to_string(),
	};
	let kind = match options.kind {
		Some(Kind::Abstract) => quote!(::ordenum::DeclarationKind::Abstract),
		Some(Kind::Final) | None => quote!(::ordenum::DeclarationKind::Final),
	};
	let serialization = options
		.serde
		.then(|| quote!(const SERIALIZATION: ::ordenum::Serialization = ::ordenum::Serialization::ByName;));

	let arg_types = options.args.clone().unwrap_or_default();
	let bindings: Vec<Ident> = (0..arg_types.len()).map(|i| format_ident!("__arg{i}")).collect();
	let construct_body = match (&options.constructor, arg_types.is_empty()) {
		(Some(path), _) => quote!(#path(#(#bindings),*)),
		(None, false) => quote!(Self::new(#(#bindings),*)),
		(None, true) => quote!(<Self as ::core::default::Default>::default()),
	};

	let declared = elements.iter().map(|element| {
		let element_name = element.ident.unraw().to_string();
		match &element.args {
			Some(args) => {
				let args = args.iter();
				quote!(.element_with(#element_name, (#(#args,)*)))
			}
			None => quote!(.element(#element_name)),
		}
	});

	let accessors = elements.iter().map(|element| {
		let accessor = &element.ident;
		let element_name = element.ident.unraw().to_string();
		let doc = format!("Returns the `{element_name}` element.");
		quote! {
			#[doc = #doc]
			#[track_caller]
			#vis fn #accessor() -> ::ordenum::ElementRef<Self> {
				::ordenum::__private::declared::<Self>(#element_name)
			}
		}
	});

	Ok(quote! {
		impl ::ordenum::Enumeration for #ty {
			type Args = (#(#arg_types,)*);
			const NAME: &'static str = #name;
			#serialization

			fn declaration() -> ::ordenum::Declaration<Self> {
				::ordenum::Declaration::new(#kind)
					#(#declared)*
			}

			fn construct((#(#bindings,)*): Self::Args) -> Self {
				#construct_body
			}
		}

		#[allow(non_snake_case)]
		impl #ty {
			#(#accessors)*
		}

		::ordenum::__private::inventory::submit! {
			::ordenum::catalog::EnumRegistration::of::<#ty>()
		}
	})
}

fn parse_options(input: &DeriveInput) -> syn::Result<Options> {
	let mut options = Options::default();
	for attr in input.attrs.iter().filter(|a| a.path().is_ident("enumeration")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				options.name = Some(meta.value()?.parse()?);
				Ok(())
			} else if meta.path.is_ident("kind") {
				let ident: Ident = meta.value()?.call(Ident::parse_any)?;
				options.kind = Some(match ident.to_string().as_str() {
					"final" => Kind::Final,
					"abstract" => Kind::Abstract,
					_ => return Err(meta.error("kind must be 'final' or 'abstract'")),
				});
				Ok(())
			} else if meta.path.is_ident("args") {
				let ty: Type = meta.value()?.parse()?;
				options.args = Some(match ty {
					Type::Tuple(tuple) => tuple.elems.into_iter().collect(),
					Type::Paren(paren) => vec![*paren.elem],
					other => vec![other],
				});
				Ok(())
			} else if meta.path.is_ident("constructor") {
				options.constructor = Some(meta.value()?.parse()?);
				Ok(())
			} else if meta.path.is_ident("serde") {
				options.serde = true;
				Ok(())
			} else {
				Err(meta.error("unknown enumeration attribute"))
			}
		})?;
	}
	Ok(options)
}

fn parse_elements(input: &DeriveInput) -> syn::Result<Vec<ElementDecl>> {
	let mut elements = Vec::new();
	let mut found = false;
	for attr in input.attrs.iter().filter(|a| a.path().is_ident("elements")) {
		found = true;
		elements.extend(attr.parse_args_with(Punctuated::<ElementDecl, Token![,]>::parse_terminated)?);
	}
	if !found {
		return Err(syn::Error::new_spanned(&input.ident, "missing #[elements(...)] attribute"));
	}
	Ok(elements)
}

/// Rejects what the resolver would reject at runtime.
fn check_elements(elements: &[ElementDecl], arg_types: Option<&[Type]>) -> syn::Result<()> {
	let mut seen = HashSet::new();
	for element in elements {
		let name = element.ident.unraw().to_string();
		if !is_ascii_identifier(&name) {
			return Err(syn::Error::new_spanned(
				&element.ident,
				format!("element name \"{name}\" must match [A-Za-z_][A-Za-z0-9_]*"),
			));
		}
		if !seen.insert(name.clone()) {
			return Err(syn::Error::new_spanned(&element.ident, format!("element {name} is declared more than once")));
		}
	}

	let with_args = elements.iter().filter(|e| e.args.is_some()).count();
	if with_args == 0 {
		return Ok(());
	}
	if with_args != elements.len() {
		let missing: Vec<String> = elements.iter().filter(|e| e.args.is_none()).map(|e| e.ident.unraw().to_string()).collect();
		return Err(syn::Error::new_spanned(
			&elements[0].ident,
			format!("all elements must carry constructor arguments, missing for {}", missing.join(", ")),
		));
	}

	let Some(arg_types) = arg_types else {
		return Err(syn::Error::new_spanned(
			&elements[0].ident,
			"elements carry constructor arguments; declare their types with #[enumeration(args = (..))]",
		));
	};
	for element in elements {
		let given = element.args.as_ref().map_or(0, Punctuated::len);
		if given != arg_types.len() {
			return Err(syn::Error::new_spanned(
				&element.ident,
				format!("expected {} constructor argument(s), got {given}", arg_types.len()),
			));
		}
	}
	Ok(())
}

fn is_ascii_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
		_ => false,
	}
}
