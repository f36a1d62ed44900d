//! Core library for scrycards
//!
//! This crate is the **Functional Core** of scrycards, a client for the
//! Scryfall Magic: The Gathering card catalog. The `scrycards` crate is the
//! imperative shell: it owns the HTTP clients and the terminal front-end,
//! and hands raw responses to the functions here.
//!
//! # Module Organization
//!
//! - [`card`]: Scryfall card records and their list/detail projections
//! - [`catalog`]: the [`catalog::CatalogApi`] contract, [`catalog::CatalogError`]
//!   and response normalization (404 on search is an empty page)
//! - [`reference`]: sets, symbols, string catalogs, rulings, bulk data
//! - [`search`]: the search state, its actions and the single-writer store
//! - [`controller`]: query validation, search orchestration, navigation
//! - [`route`]: the search and card detail routes
//! - [`version`]: the backend version badge slice
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scrycards_core::controller::SearchController;
//! use scrycards_core::search::{SearchStore, SearchView};
//!
//! let controller = SearchController::new(client, Arc::new(SearchStore::new()));
//! controller.submit_search("Lightning Bolt", 1).await;
//!
//! match SearchView::from_state(&controller.state()) {
//!     SearchView::Results { cards, .. } => println!("{} cards", cards.len()),
//!     other => println!("{other:?}"),
//! }
//! ```

pub mod card;
pub mod catalog;
pub mod controller;
pub mod reference;
pub mod route;
pub mod search;
pub mod version;
