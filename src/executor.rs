//! Command dispatch.
//!
//! The executor validates a [`Command`]'s shape (argument count first, then
//! numeric conversions) and only then touches the catalog. Validation
//! failures are answered with a descriptive string and never reach the
//! store.

use log::trace;

use crate::catalog::Catalog;
use crate::command::Command;

const LIST_ITEM: &str = "list-item";
const LIST_ITEMS: &str = "list-items";
const BUY_ITEM: &str = "buy-item";
const BID_ITEM: &str = "bid-item";
const VIEW_BIDS: &str = "view-bids";
const REMOVE_ITEM: &str = "remove-item";

const ARG_COUNT_ONE: usize = 1;
const ARG_COUNT_TWO: usize = 2;
const ARG_COUNT_THREE: usize = 3;

fn invalid_args_count(command: &str, expected: usize, usage: &str) -> String {
    format!(
        "Invalid count of arguments: \"{}\" expects {} arguments. Example: \"{}\"",
        command, expected, usage
    )
}

pub struct Executor {
    catalog: Catalog,
}

impl Executor {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn execute(&mut self, cmd: Command) -> String {
        trace!("executing {:?}", cmd);
        match cmd.name() {
            LIST_ITEM => self.list_item(cmd.arguments()),
            LIST_ITEMS => self.list_items(),
            BUY_ITEM => self.buy_item(cmd.arguments()),
            BID_ITEM => self.bid_item(cmd.arguments()),
            VIEW_BIDS => self.view_bids(cmd.arguments()),
            REMOVE_ITEM => self.remove_item(cmd.arguments()),
            _ => "Unknown command".to_string(),
        }
    }

    fn list_item(&mut self, args: &[String]) -> String {
        if args.len() != ARG_COUNT_THREE {
            return invalid_args_count(
                LIST_ITEM,
                ARG_COUNT_THREE,
                "list-item <username> <item_name> <price>",
            );
        }

        let user = &args[0];
        let name = &args[1];
        let price: f64 = match args[2].parse() {
            Ok(price) => price,
            Err(_) => return "Invalid price: must be a number.".to_string(),
        };

        match self.catalog.add_item(user, name, price) {
            Ok(id) => format!("Item listed with ID {} by {} for ${:.2}", id, user, price),
            // blank name or non-positive price, answered rather than raised
            Err(e) => e.to_string(),
        }
    }

    fn list_items(&self) -> String {
        let items = self.catalog.list_items();
        if items.is_empty() {
            return "No items currently listed.".to_string();
        }

        let mut response = String::from("Items for sale:\n");
        for (id, item) in items {
            response.push_str(&format!("[{}] {}\n", id, item));
        }
        response
    }

    fn buy_item(&mut self, args: &[String]) -> String {
        if args.len() != ARG_COUNT_TWO {
            return invalid_args_count(BUY_ITEM, ARG_COUNT_TWO, "buy-item <username> <item_id>");
        }

        let user = &args[0];
        let item_id: i64 = match args[1].parse() {
            Ok(id) => id,
            Err(_) => return "Invalid item ID: must be an integer.".to_string(),
        };

        self.catalog.buy_item(user, item_id)
    }

    fn bid_item(&mut self, args: &[String]) -> String {
        if args.len() != ARG_COUNT_THREE {
            return invalid_args_count(
                BID_ITEM,
                ARG_COUNT_THREE,
                "bid-item <username> <item_id> <bid_price>",
            );
        }

        let user = &args[0];
        let (item_id, bid_price): (i64, f64) = match (args[1].parse(), args[2].parse()) {
            (Ok(id), Ok(price)) => (id, price),
            _ => {
                return "Invalid input: item ID must be an integer and bid price a number."
                    .to_string()
            }
        };

        self.catalog.place_bid(user, item_id, bid_price)
    }

    fn view_bids(&self, args: &[String]) -> String {
        if args.len() != ARG_COUNT_ONE {
            return invalid_args_count(VIEW_BIDS, ARG_COUNT_ONE, "view-bids <item_id>");
        }

        let item_id: i64 = match args[0].parse() {
            Ok(id) => id,
            Err(_) => return "Invalid item ID: must be an integer.".to_string(),
        };

        self.catalog.view_bids(item_id)
    }

    fn remove_item(&mut self, args: &[String]) -> String {
        if args.len() != ARG_COUNT_TWO {
            return invalid_args_count(
                REMOVE_ITEM,
                ARG_COUNT_TWO,
                "remove-item <username> <item_id>",
            );
        }

        let user = &args[0];
        let item_id: i64 = match args[1].parse() {
            Ok(id) => id,
            Err(_) => return "Invalid item ID: must be an integer.".to_string(),
        };

        self.catalog.remove_item(user, item_id)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(Catalog::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(executor: &mut Executor, line: &str) -> String {
        executor.execute(Command::from_input(line))
    }

    #[test]
    fn test_unknown_command() {
        let mut executor = Executor::default();
        assert_eq!(run(&mut executor, "frobnicate 1 2"), "Unknown command");
        assert_eq!(run(&mut executor, ""), "Unknown command");
    }

    #[test]
    fn test_list_item() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "list-item alice car 4.0"),
            "Item listed with ID 0 by alice for $4.00"
        );
        assert_eq!(
            run(&mut executor, "list-item alice bike 10"),
            "Item listed with ID 1 by alice for $10.00"
        );
    }

    #[test]
    fn test_list_item_validation() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "list-item alice car"),
            "Invalid count of arguments: \"list-item\" expects 3 arguments. \
             Example: \"list-item <username> <item_name> <price>\""
        );
        assert_eq!(
            run(&mut executor, "list-item alice car cheap"),
            "Invalid price: must be a number."
        );
        assert_eq!(
            run(&mut executor, "list-item alice \"   \" 4.0"),
            "Item name cannot be empty."
        );
        assert_eq!(
            run(&mut executor, "list-item alice car -4.0"),
            "Price must be greater than 0."
        );
    }

    #[test]
    fn test_list_items() {
        let mut executor = Executor::default();
        assert_eq!(run(&mut executor, "list-items"), "No items currently listed.");

        run(&mut executor, "list-item alice car 4.0");
        run(&mut executor, "list-item bob bike 10.0");
        assert_eq!(
            run(&mut executor, "list-items"),
            "Items for sale:\n[0] car (by alice) - $4.0\n[1] bike (by bob) - $10.0\n"
        );
    }

    #[test]
    fn test_buy_item_validation() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "buy-item bob"),
            "Invalid count of arguments: \"buy-item\" expects 2 arguments. \
             Example: \"buy-item <username> <item_id>\""
        );
        assert_eq!(
            run(&mut executor, "buy-item bob first"),
            "Invalid item ID: must be an integer."
        );
    }

    #[test]
    fn test_bid_item_validation() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "bid-item bob 0"),
            "Invalid count of arguments: \"bid-item\" expects 3 arguments. \
             Example: \"bid-item <username> <item_id> <bid_price>\""
        );
        assert_eq!(
            run(&mut executor, "bid-item bob zero 15.0"),
            "Invalid input: item ID must be an integer and bid price a number."
        );
        assert_eq!(
            run(&mut executor, "bid-item bob 0 lots"),
            "Invalid input: item ID must be an integer and bid price a number."
        );
    }

    #[test]
    fn test_view_bids_validation() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "view-bids"),
            "Invalid count of arguments: \"view-bids\" expects 1 arguments. \
             Example: \"view-bids <item_id>\""
        );
        assert_eq!(
            run(&mut executor, "view-bids zero"),
            "Invalid item ID: must be an integer."
        );
    }

    #[test]
    fn test_remove_item_validation() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "remove-item alice"),
            "Invalid count of arguments: \"remove-item\" expects 2 arguments. \
             Example: \"remove-item <username> <item_id>\""
        );
        assert_eq!(
            run(&mut executor, "remove-item alice zero"),
            "Invalid item ID: must be an integer."
        );
    }

    #[test]
    fn test_quoted_item_names() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "list-item alice \"red car\" 4.0"),
            "Item listed with ID 0 by alice for $4.00"
        );
        assert_eq!(
            run(&mut executor, "list-items"),
            "Items for sale:\n[0] red car (by alice) - $4.0\n"
        );
    }

    #[test]
    fn test_full_auction_scenario() {
        let mut executor = Executor::default();
        assert_eq!(
            run(&mut executor, "list-item alice car 10.0"),
            "Item listed with ID 0 by alice for $10.00"
        );
        assert_eq!(
            run(&mut executor, "bid-item bob 0 15.0"),
            "Bid placed by bob for $15.0"
        );
        assert_eq!(
            run(&mut executor, "view-bids 0"),
            "Bids for car:\nbob - $15.00\n"
        );
        assert_eq!(
            run(&mut executor, "buy-item charlie 0"),
            "Item bought by charlie for $15.0"
        );
        assert_eq!(
            run(&mut executor, "remove-item alice 0"),
            "Item has already been sold and cannot be removed."
        );
    }
}
