//! Search nodes: UCT scoring, selection, expansion and final-move choice.

use std::rc::Rc;

use crate::{Game, MctsError, Node, NodeRef, SearchState};

/// Exploration constant of the UCT formula, close to `sqrt(2)`.
pub const UCT_EXPLORATION: f64 = 1.41;

/// Data stored in each node of the search tree.
#[derive(Clone, Debug)]
pub struct SearchNodeData<G: Game>{
    state: SearchState<G>,
    /// Move that led from the parent to this node, `None` at the root.
    action: Option<G::Move>,
    /// Last value computed by `SearchNode::fill_uct_value`.
    uct_value: f64
}

impl<G: Game> SearchNodeData<G>{
    /// Node data for `state`, reached by `action` (`None` on the root).
    #[inline]
    pub fn new(state: SearchState<G>, action: Option<G::Move>) -> Self{
        SearchNodeData { state, action, uct_value: 0.0 }
    }

    /// Position and statistics of the node.
    #[inline]
    pub fn state(&self) -> &SearchState<G>{
        &self.state
    }

    /// Mutable access to the statistics, used by backpropagation.
    #[inline]
    pub fn state_mut(&mut self) -> &mut SearchState<G>{
        &mut self.state
    }

    /// The move that led from the parent to this node.
    #[inline]
    pub fn action(&self) -> Option<G::Move>{
        self.action
    }

    /// UCT value cached by the last `fill_uct_value`.
    #[inline]
    pub fn uct_value(&self) -> f64{
        self.uct_value
    }
}

/// Type alias for a tree node holding search data.
pub type SearchNode<G> = Node<SearchNodeData<G>>;
/// Type alias for a strong reference to a `SearchNode`.
pub type SearchNodeRef<G> = NodeRef<SearchNodeData<G>>;

/// The UCT formula for a visited node.
///
/// `score / visits + exploration_coef * sqrt(ln(parent_visits) / visits)`
///
/// # Parameters
/// - `score`: Accumulated reward of the node.
/// - `visits`: Visit count of the node, must be positive.
/// - `parent_visits`: Visit count of the node's parent.
/// - `exploration_coef`: Weight of the exploration term.
#[inline]
pub fn uct_value(score: f64, visits: u64, parent_visits: u64, exploration_coef: f64) -> f64{
    let visits = visits as f64;
    score / visits + exploration_coef * ((parent_visits as f64).ln() / visits).sqrt()
}

impl<G: Game> Node<SearchNodeData<G>>{
    /// Recomputes and caches the UCT value of `node`.
    ///
    /// Unvisited nodes get `f64::INFINITY` so they are tried before any visited
    /// sibling.
    ///
    /// # Returns
    /// The new value, or `Err(MctsError::MissingParent)` when `node` is a root:
    /// a root is never ranked against siblings.
    pub fn fill_uct_value(node: &SearchNodeRef<G>, exploration_coef: f64) -> Result<f64, MctsError>{
        let node = &mut *node.borrow_mut();
        let parent = node.get_parent().ok_or(MctsError::MissingParent)?;

        let visits = node.get().state.visit_count();
        let value = if visits == 0 {
            f64::INFINITY
        }
        else {
            let parent_visits = parent.borrow().get().state.visit_count();
            uct_value(node.get().state.score(), visits, parent_visits, exploration_coef)
        };

        node.get_mut().uct_value = value;
        Ok(value)
    }

    /// Picks the child with the highest UCT value, refreshing every child's
    /// cached value on the way. Ties go to the earliest created child.
    ///
    /// Does not recurse. A node without children is its own most promising node.
    pub fn select_promising_node(node: &SearchNodeRef<G>, exploration_coef: f64) -> Result<SearchNodeRef<G>, MctsError>{
        let current = node.borrow();
        let mut best: Option<(f64, &SearchNodeRef<G>)> = None;

        for child in current.children(){
            let value = Self::fill_uct_value(child, exploration_coef)?;
            if best.map_or(true, |(best_value, _)| value > best_value){
                best = Some((value, child));
            }
        }

        Ok(match best {
            Some((_, child)) => Rc::clone(child),
            None => Rc::clone(node)
        })
    }

    /// Creates one child per legal move of the node's snapshot.
    ///
    /// Each child gets its own copy of the snapshot with the move applied for
    /// the opponent of the node's `last_player`. Calling this twice duplicates
    /// the children; callers check `is_leaf()` first.
    ///
    /// # Returns
    /// The number of children created.
    pub fn expand(node: &SearchNodeRef<G>) -> usize{
        let children: Vec<SearchNodeData<G>> = {
            let current = node.borrow();
            let state = &current.get().state;
            let mover = state.last_player().opponent();

            state.board().empty_places().into_iter()
                .map(|action| SearchNodeData::new(state.next_state(action, mover), Some(action)))
                .collect()
        };

        let count = children.len();
        for data in children{
            Node::add_child(node, data);
        }
        count
    }

    /// The most visited child (the "most robust child"). Ties go to the
    /// earliest created child.
    ///
    /// # Returns
    /// `Err(MctsError::NoChildren)` when the node was never expanded or its
    /// game had no legal move.
    pub fn winner_child(node: &SearchNodeRef<G>) -> Result<SearchNodeRef<G>, MctsError>{
        let current = node.borrow();
        let mut best: Option<(u64, &SearchNodeRef<G>)> = None;

        for child in current.children(){
            let visits = child.borrow().get().state.visit_count();
            if best.map_or(true, |(best_visits, _)| visits > best_visits){
                best = Some((visits, child));
            }
        }

        let winner = best.map(|(_, child)| Rc::clone(child));
        winner.ok_or(MctsError::NoChildren)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{test_utils::{approx_eq, Countdown}, tictactoe::TicTacToe, Player};

    fn countdown_root(stones: u8) -> SearchNodeRef<Countdown>{
        Node::new_root(SearchNodeData::new(SearchState::new(Countdown::new(stones), Player::Second), None))
    }

    fn visit(node: &SearchNodeRef<Countdown>, times: u64, winner: Option<Player>){
        for _ in 0..times{
            node.borrow_mut().get_mut().state_mut().record_visit(winner, 10.0);
        }
    }

    #[test]
    fn test_uct_unvisited_is_infinite() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let child = root.borrow().get_child(0).unwrap();

        assert_eq!(SearchNode::fill_uct_value(&child, UCT_EXPLORATION)?, f64::INFINITY);
        assert_eq!(child.borrow().get().uct_value(), f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_uct_formula() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let child = root.borrow().get_child(1).unwrap();

        visit(&root, 10, None);
        visit(&child, 2, Some(Player::First));
        visit(&child, 2, None);

        let expected = 20.0 / 4.0 + 1.41 * ((10f64).ln() / 4.0).sqrt();
        let value = SearchNode::fill_uct_value(&child, UCT_EXPLORATION)?;
        assert!(approx_eq(value, expected));
        Ok(())
    }

    #[test]
    fn test_uct_on_root_fails(){
        let root = countdown_root(4);
        assert_matches!(SearchNode::fill_uct_value(&root, UCT_EXPLORATION), Err(MctsError::MissingParent));
    }

    #[test]
    fn test_uct_decreases_with_visits_at_fixed_ratio(){
        let mut previous = f64::INFINITY;
        for visits in 1..50u64{
            let value = uct_value(5.0 * visits as f64, visits, 100, UCT_EXPLORATION);
            assert!(value < previous);
            previous = value;
        }
    }

    #[test]
    fn test_select_on_leaf_returns_self() -> Result<(), MctsError>{
        let root = countdown_root(4);
        let selected = SearchNode::select_promising_node(&root, UCT_EXPLORATION)?;
        assert!(Rc::ptr_eq(&selected, &root));
        Ok(())
    }

    #[test]
    fn test_select_prefers_unvisited() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let first = root.borrow().get_child(0).unwrap();
        let second = root.borrow().get_child(1).unwrap();

        visit(&root, 1000, None);
        visit(&first, 1000, Some(Player::First));

        let selected = SearchNode::select_promising_node(&root, UCT_EXPLORATION)?;
        assert!(Rc::ptr_eq(&selected, &second));
        Ok(())
    }

    #[test]
    fn test_select_ties_go_to_first_child() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let first = root.borrow().get_child(0).unwrap();

        let selected = SearchNode::select_promising_node(&root, UCT_EXPLORATION)?;
        assert!(Rc::ptr_eq(&selected, &first));

        visit(&root, 4, None);
        for child in root.borrow().children(){
            visit(child, 2, Some(Player::First));
        }
        let selected = SearchNode::select_promising_node(&root, UCT_EXPLORATION)?;
        assert!(Rc::ptr_eq(&selected, &first));
        Ok(())
    }

    #[test]
    fn test_select_prefers_higher_average() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let first = root.borrow().get_child(0).unwrap();
        let second = root.borrow().get_child(1).unwrap();

        visit(&root, 20, None);
        visit(&first, 10, None);
        visit(&second, 10, Some(Player::First));

        let selected = SearchNode::select_promising_node(&root, UCT_EXPLORATION)?;
        assert!(Rc::ptr_eq(&selected, &second));
        Ok(())
    }

    #[test]
    fn test_expand_creates_one_child_per_move(){
        let root: SearchNodeRef<TicTacToe> = Node::new_root(
            SearchNodeData::new(SearchState::new(TicTacToe::new(), Player::Second), None)
        );

        assert_eq!(SearchNode::expand(&root), 9);

        let root_node = root.borrow();
        for (index, child) in root_node.children().iter().enumerate(){
            let child = child.borrow();
            let state = child.get().state();

            assert_eq!(child.get().action(), Some(index));
            assert_eq!(state.last_player(), Player::First);
            assert_eq!(state.board().cell(index), Some(Player::First));
            assert_eq!(state.board().empty_places().len(), 8);
            assert_eq!(state.visit_count(), 0);
        }
        assert_eq!(root_node.get().state().board().empty_places().len(), 9);
    }

    #[test]
    fn test_expand_on_finished_game_creates_nothing(){
        let root = countdown_root(0);
        assert_eq!(SearchNode::expand(&root), 0);
        assert!(root.borrow().is_leaf());
    }

    #[test]
    fn test_winner_child_is_most_visited() -> Result<(), MctsError>{
        let root = countdown_root(4);
        SearchNode::expand(&root);
        let first = root.borrow().get_child(0).unwrap();
        let second = root.borrow().get_child(1).unwrap();

        visit(&first, 3, Some(Player::First));
        visit(&second, 5, None);

        let winner = SearchNode::winner_child(&root)?;
        assert!(Rc::ptr_eq(&winner, &second));

        visit(&first, 2, None);
        let winner = SearchNode::winner_child(&root)?;
        assert!(Rc::ptr_eq(&winner, &first));
        Ok(())
    }

    #[test]
    fn test_winner_child_without_children_fails(){
        let root = countdown_root(4);
        assert_matches!(SearchNode::winner_child(&root), Err(MctsError::NoChildren));
    }
}
