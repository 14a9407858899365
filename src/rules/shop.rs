//! Shop and economy.
//!
//! When a round is cleared the shop offers one slot per enemy template
//! encountered that round. Each offer can be bought once. Bought cards
//! join the deck, which is reshuffled.

use tracing::debug;

use super::engine::Engine;
use crate::core::{GameError, GameEvent, GameResult, GameState, GameStatus, ShopOffer};

impl Engine {
    /// Fill the shop from the templates encountered this round.
    pub fn open_shop(&self, state: &mut GameState) {
        state.shop = state
            .encountered
            .iter()
            .filter_map(|&card_id| self.cards.get(card_id))
            .map(|def| ShopOffer {
                card_id: def.id,
                name: def.name.clone(),
                cost: def.cost,
            })
            .collect();
    }

    /// Buy the offer at `offer_index`.
    pub fn buy_card(&self, state: &mut GameState, offer_index: usize) -> GameResult<()> {
        if state.status != GameStatus::Shop {
            return Err(GameError::GameNotInShop);
        }
        let offer = state
            .shop
            .get(offer_index)
            .cloned()
            .ok_or(GameError::InvalidShopIndex { index: offer_index })?;

        let limit = self.config.deck.max_copies;
        if state.copies_owned(offer.card_id) >= limit {
            return Err(GameError::MaxCopiesPerCard {
                card: offer.card_id,
                limit,
            });
        }
        state.spend_gold(offer.cost)?;

        let card = state.new_card(offer.card_id);
        let instance_id = card.instance_id;
        state.deck.push_back(card);
        state.shuffle_deck();
        state.shop.remove(offer_index);
        state.events.push_back(GameEvent::CardBought {
            card_id: offer.card_id,
            instance_id,
        });
        debug!(card = %offer.name, gold = state.gold, deck = state.deck.len(), "card bought");
        Ok(())
    }
}
