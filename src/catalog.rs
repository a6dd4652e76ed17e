//! In-memory item catalog.
//!
//! All marketplace business rules live here. Every operation reports its
//! outcome as a human-readable status string; only add-time argument
//! construction fails with a [`MarketErr`]. The catalog is confined to the
//! event-loop thread and performs no locking.

use log::trace;

use crate::err::MarketErr;
use crate::helper::format_amount;

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bid {
    user: String,
    amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Item {
    owner: String,
    name: String,
    price: f64,
    sold: bool,
    bids: Vec<Bid>,
}

impl Item {
    fn new(owner: &str, name: &str, price: f64) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            price,
            sold: false,
            bids: Vec::new(),
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} (by {}) - ${}{}",
            self.name,
            self.owner,
            format_amount(self.price),
            if self.sold { " [SOLD]" } else { "" }
        )
    }
}

/// Items in an arena keyed by insertion index. A removed item leaves a vacant
/// slot behind, so ids stay strictly increasing and are never reused.
#[derive(Debug, Default)]
pub struct Catalog {
    items: Vec<Option<Item>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn item(&self, id: i64) -> Option<&Item> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.items.get(idx))
            .and_then(|slot| slot.as_ref())
    }

    fn item_mut(&mut self, id: i64) -> Option<&mut Item> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.items.get_mut(idx))
            .and_then(|slot| slot.as_mut())
    }

    /// List a new item for sale, returning its assigned id.
    pub fn add_item(&mut self, user: &str, name: &str, price: f64) -> Result<i64, MarketErr> {
        if name.trim().is_empty() {
            return Err(MarketErr::InvalidItemName);
        }
        if price <= 0.0 {
            return Err(MarketErr::InvalidPrice);
        }

        let id = self.items.len() as i64;
        self.items.push(Some(Item::new(user, name, price)));
        trace!("item {} listed by {} for {}", id, user, price);
        Ok(id)
    }

    /// Mark an item as sold at its current price. The sold flag only ever
    /// goes from false to true; repeat buys fail the same way every time.
    pub fn buy_item(&mut self, user: &str, id: i64) -> String {
        let Some(item) = self.item_mut(id) else {
            return "Item not found.".to_string();
        };
        if item.sold {
            return "Item already sold.".to_string();
        }
        item.sold = true;
        trace!("item {} bought by {}", id, user);
        format!("Item bought by {} for ${}", user, format_amount(item.price))
    }

    /// Record a bid strictly above the current price; the accepted amount
    /// becomes the item's new price.
    pub fn place_bid(&mut self, user: &str, id: i64, amount: f64) -> String {
        let Some(item) = self.item_mut(id) else {
            return "Cannot place bid: item not found or already sold.".to_string();
        };
        if item.sold {
            return "Cannot place bid: item not found or already sold.".to_string();
        }
        if item.owner == user {
            return "You cannot place a bid on your own item.".to_string();
        }
        if amount <= item.price {
            return format!(
                "Bid rejected: your bid of ${:.2} is not higher than the current price of ${:.2}.",
                amount, item.price
            );
        }

        item.price = amount;
        item.bids.push(Bid {
            user: user.to_string(),
            amount,
        });
        trace!("bid on item {} by {} for {}", id, user, amount);
        format!("Bid placed by {} for ${}", user, format_amount(amount))
    }

    /// Bid history of an item, oldest first.
    pub fn view_bids(&self, id: i64) -> String {
        let Some(item) = self.item(id) else {
            return "Item not found.".to_string();
        };

        let mut response = format!("Bids for {}:\n", item.name);
        for bid in &item.bids {
            response.push_str(&format!("{} - ${:.2}\n", bid.user, bid.amount));
        }
        response
    }

    /// Delete an unsold item on behalf of its owner. The slot is vacated;
    /// the id is never handed out again.
    pub fn remove_item(&mut self, user: &str, id: i64) -> String {
        let Some(item) = self.item(id) else {
            return "Item not found.".to_string();
        };
        if item.owner != user {
            return "Only the item owner can remove it.".to_string();
        }
        if item.sold {
            return "Item has already been sold and cannot be removed.".to_string();
        }

        self.items[id as usize] = None;
        trace!("item {} removed by {}", id, user);
        format!("Item removed by {}", user)
    }

    /// Descriptions of all unsold items, keyed by their original ids.
    pub fn list_items(&self) -> BTreeMap<i64, String> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|item| (idx as i64, item)))
            .filter(|(_, item)| !item.sold)
            .map(|(id, item)| (id, item.describe()))
            .collect()
    }
}
