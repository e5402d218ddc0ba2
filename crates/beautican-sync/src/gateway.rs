//! # Remote Cart Gateway
//!
//! The request/response contract with the cart backend.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Backend Contract                            │
//! │                                                                         │
//! │  fetch_cart()          GET  /cart.js                                    │
//! │                        ◄── { items, item_count, total_price }           │
//! │                                                                         │
//! │  add_line(v, q)        POST /cart/add.js     { "id": v, "quantity": q } │
//! │                        ◄── (body ignored, caller re-fetches)            │
//! │                                                                         │
//! │  change_line(k, q)     POST /cart/change.js  { "id": k, "quantity": q } │
//! │                        ◄── { items, item_count, total_price }           │
//! │                        q = 0 removes the line                           │
//! │                                                                         │
//! │  Any non-2xx status ──► TransportError::Status                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations live in this crate: [`HttpCartGateway`](crate::http::HttpCartGateway)
//! talks to a real backend, [`MemoryCartGateway`] simulates one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use beautican_core::{CartSnapshot, LineItem, LineKey, Money, VariantId};

use crate::error::TransportError;

pub const CART_PATH: &str = "/cart.js";
pub const ADD_PATH: &str = "/cart/add.js";
pub const CHANGE_PATH: &str = "/cart/change.js";

// =============================================================================
// Gateway Trait
// =============================================================================

/// Backend cart operations. Each call is one atomic request/response pair.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetches the current cart. No side effects beyond the request.
    async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError>;

    /// Appends or increments a line. Does not return the new cart.
    async fn add_line(&self, variant_id: VariantId, quantity: u32) -> Result<(), TransportError>;

    /// Sets a line's quantity to an absolute value; 0 removes the line.
    async fn change_line(&self, line_key: &LineKey, quantity: u32) -> Result<CartSnapshot, TransportError>;
}

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `POST /cart/add.js`.
#[derive(Debug, Clone, Serialize)]
pub struct AddLineRequest {
    pub id: u64,
    pub quantity: u32,
}

/// Body of `POST /cart/change.js`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeLineRequest<'a> {
    pub id: &'a str,
    pub quantity: u32,
}

/// Cart JSON as returned by `/cart.js` and `/cart/change.js`.
///
/// Only the fields the storefront uses are declared; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    pub items: Vec<LinePayload>,
    pub item_count: u32,
    pub total_price: i64,
}

/// One entry of `items` in the cart JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct LinePayload {
    pub key: String,
    pub variant_id: u64,
    pub quantity: u32,
    #[serde(default)]
    pub final_line_price: Option<i64>,
    #[serde(default)]
    pub line_price: Option<i64>,
    #[serde(default)]
    pub product_title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartPayload {
    /// Converts the wire shape into a validated snapshot.
    ///
    /// Reported totals are kept as sent; a disagreement with the line sums
    /// (a cart-level discount, for one) is only logged.
    ///
    /// ## Errors
    /// - `Decode` if a line has variant id 0 or no price at all
    /// - `InconsistentSnapshot` if a line has quantity 0 or a key repeats
    pub fn into_snapshot(self, endpoint: &str) -> Result<CartSnapshot, TransportError> {
        let items = self
            .items
            .into_iter()
            .map(|line| line.into_line_item(endpoint))
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot = CartSnapshot {
            items,
            item_count: self.item_count,
            total_price: Money::from_cents(self.total_price),
        };

        snapshot
            .validate()
            .map_err(|source| TransportError::InconsistentSnapshot {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if let Err(mismatch) = snapshot.check_totals() {
            warn!(endpoint, %mismatch, "cart totals differ from line sums, keeping reported totals");
        }

        Ok(snapshot)
    }
}

impl LinePayload {
    fn into_line_item(self, endpoint: &str) -> Result<LineItem, TransportError> {
        let decode = |message: String| TransportError::Decode {
            endpoint: endpoint.to_string(),
            message,
        };

        let variant_id = VariantId::new(self.variant_id)
            .ok_or_else(|| decode(format!("line {} has variant_id 0", self.key)))?;
        let price = self
            .final_line_price
            .or(self.line_price)
            .ok_or_else(|| decode(format!("line {} has no price", self.key)))?;

        Ok(LineItem {
            key: LineKey::new(self.key),
            variant_id,
            quantity: self.quantity,
            line_price: Money::from_cents(price),
            product_title: self.product_title,
            variant_title: self.variant_title.unwrap_or_default(),
            title: self.title,
            image_url: self.image,
        })
    }
}

// =============================================================================
// In-Memory Gateway
// =============================================================================

/// A variant the simulated backend can sell.
#[derive(Debug, Clone)]
pub struct CatalogVariant {
    pub variant_id: VariantId,
    pub product_title: String,
    pub variant_title: String,
    pub unit_price: Money,
    pub image_url: Option<String>,
}

/// A request the simulated backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    FetchCart,
    AddLine { variant_id: VariantId, quantity: u32 },
    ChangeLine { line_key: LineKey, quantity: u32 },
}

/// Which operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    FetchCart,
    AddLine,
    ChangeLine,
}

#[derive(Debug, Default)]
struct MemoryCart {
    lines: Vec<LineItem>,
    next_seq: u64,
    calls: Vec<GatewayCall>,
    failures: HashMap<GatewayOp, u16>,
}

/// Simulated cart backend with backend-like semantics.
///
/// - add on a variant already in the cart increments that line
/// - change to 0 removes the line; unknown line key → HTTP 400
/// - add of a variant not in the catalog → HTTP 422
///
/// Every request is recorded, and the next call of an operation can be
/// scripted to fail with a status code.
#[derive(Debug, Default)]
pub struct MemoryCartGateway {
    catalog: HashMap<VariantId, CatalogVariant>,
    cart: Mutex<MemoryCart>,
}

impl MemoryCartGateway {
    pub fn new(catalog: impl IntoIterator<Item = CatalogVariant>) -> Self {
        MemoryCartGateway {
            catalog: catalog.into_iter().map(|v| (v.variant_id, v)).collect(),
            cart: Mutex::new(MemoryCart::default()),
        }
    }

    /// A small catalog used by the demo mode of the binary.
    pub fn demo() -> Self {
        let variant = |id: u64, product: &str, variant: &str, cents: i64| {
            VariantId::new(id).map(|variant_id| CatalogVariant {
                variant_id,
                product_title: product.to_string(),
                variant_title: variant.to_string(),
                unit_price: Money::from_cents(cents),
                image_url: Some(format!("/images/{}.jpg", id)),
            })
        };
        Self::new(
            [
                variant(501, "Rose Glow Serum", "30 ml", 4500),
                variant(502, "Oud Night Cream", "50 ml", 7845),
                variant(503, "Argan Hair Oil", "100 ml", 3900),
            ]
            .into_iter()
            .flatten(),
        )
    }

    /// Fails the next call of `op` with the given HTTP status.
    pub fn fail_next(&self, op: GatewayOp, status: u16) {
        self.lock().failures.insert(op, status);
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// The cart as the simulated backend currently holds it.
    pub fn current(&self) -> CartSnapshot {
        CartSnapshot::from_items(self.lock().lines.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryCart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(cart: &mut MemoryCart, call: GatewayCall, op: GatewayOp, endpoint: &str) -> Result<(), TransportError> {
        debug!(?call, "memory gateway request");
        cart.calls.push(call);
        match cart.failures.remove(&op) {
            Some(status) => Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CartGateway for MemoryCartGateway {
    async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError> {
        let mut cart = self.lock();
        Self::begin(&mut cart, GatewayCall::FetchCart, GatewayOp::FetchCart, CART_PATH)?;
        Ok(CartSnapshot::from_items(cart.lines.clone()))
    }

    async fn add_line(&self, variant_id: VariantId, quantity: u32) -> Result<(), TransportError> {
        let mut cart = self.lock();
        Self::begin(
            &mut cart,
            GatewayCall::AddLine {
                variant_id,
                quantity,
            },
            GatewayOp::AddLine,
            ADD_PATH,
        )?;

        let variant = self.catalog.get(&variant_id).ok_or(TransportError::Status {
            endpoint: ADD_PATH.to_string(),
            status: 422,
        })?;

        if let Some(line) = cart.lines.iter_mut().find(|l| l.variant_id == variant_id) {
            line.quantity += quantity;
            line.line_price = variant.unit_price.multiply_quantity(line.quantity as i64);
            return Ok(());
        }

        cart.next_seq += 1;
        let key = LineKey::new(format!("{}:{:08x}", variant_id, cart.next_seq));
        cart.lines.push(LineItem {
            key,
            variant_id,
            quantity,
            line_price: variant.unit_price.multiply_quantity(quantity as i64),
            product_title: variant.product_title.clone(),
            variant_title: variant.variant_title.clone(),
            title: format!("{} - {}", variant.product_title, variant.variant_title),
            image_url: variant.image_url.clone(),
        });
        Ok(())
    }

    async fn change_line(&self, line_key: &LineKey, quantity: u32) -> Result<CartSnapshot, TransportError> {
        let mut cart = self.lock();
        Self::begin(
            &mut cart,
            GatewayCall::ChangeLine {
                line_key: line_key.clone(),
                quantity,
            },
            GatewayOp::ChangeLine,
            CHANGE_PATH,
        )?;

        let index = cart
            .lines
            .iter()
            .position(|l| &l.key == line_key)
            .ok_or(TransportError::Status {
                endpoint: CHANGE_PATH.to_string(),
                status: 400,
            })?;

        if quantity == 0 {
            cart.lines.remove(index);
        } else {
            let unit_price = self
                .catalog
                .get(&cart.lines[index].variant_id)
                .map(|v| v.unit_price)
                .unwrap_or(Money::zero());
            let line = &mut cart.lines[index];
            line.quantity = quantity;
            line.line_price = unit_price.multiply_quantity(quantity as i64);
        }

        Ok(CartSnapshot::from_items(cart.lines.clone()))
    }
}
