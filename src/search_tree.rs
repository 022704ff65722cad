//! The search tree built for one move decision.

use std::rc::Rc;

use crate::{Game, MctsError, Node, Player, SearchNode, SearchNodeData, SearchNodeRef, SearchState};

/// Statistics of one root child, i.e. one candidate move.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStatistics<M>{
    pub action: M,
    pub visit_count: u64,
    pub score: f64
}

/// Owns the root of a search tree and, through it, every node.
pub struct SearchTree<G: Game>{
    root: SearchNodeRef<G>
}

impl<G: Game> SearchTree<G>{
    /// Builds a tree for `mover` to play from `board`.
    ///
    /// The root is tagged with the opponent of `mover` as its last player, so
    /// the root's children are `mover`'s candidate moves. The root is expanded
    /// immediately; a finished `board` yields a root without children.
    ///
    /// # Examples
    /// ```rust
    /// use uct_engine::{tictactoe::TicTacToe, Player, SearchTree};
    /// let tree = SearchTree::new(TicTacToe::new(), Player::First);
    /// assert_eq!(tree.root().borrow().child_count(), 9);
    /// ```
    pub fn new(board: G, mover: Player) -> Self{
        let root = Node::new_root(SearchNodeData::new(SearchState::new(board, mover.opponent()), None));
        SearchNode::expand(&root);
        SearchTree { root }
    }

    /// The root node, holding the position the search started from.
    #[inline]
    pub fn root(&self) -> &SearchNodeRef<G>{
        &self.root
    }

    /// Walks down from the root through `select_promising_node` until it
    /// reaches a node without children.
    ///
    /// The returned node is a leaf of the materialized tree, which is not
    /// necessarily a finished game.
    pub fn select_leaf(&self, exploration_coef: f64) -> Result<SearchNodeRef<G>, MctsError>{
        let mut node = Rc::clone(&self.root);
        loop {
            let next = SearchNode::select_promising_node(&node, exploration_coef)?;
            if Rc::ptr_eq(&next, &node){
                return Ok(node);
            }
            node = next;
        }
    }

    /// The most visited root child.
    #[inline]
    pub fn winner_child(&self) -> Result<SearchNodeRef<G>, MctsError>{
        SearchNode::winner_child(&self.root)
    }

    /// Visit count and score of every root child, in creation order.
    pub fn root_statistics(&self) -> Vec<ChildStatistics<G::Move>>{
        self.root.borrow().children().iter()
            .filter_map(|child| {
                let child = child.borrow();
                let data = child.get();
                data.action().map(|action| ChildStatistics {
                    action,
                    visit_count: data.state().visit_count(),
                    score: data.state().score()
                })
            })
            .collect()
    }

    /// Number of materialized nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize{
        Node::subtree_size(&self.root)
    }
}

impl<G: Game> Clone for SearchTree<G>{
    /// Copies every node; the copy shares nothing with the original.
    fn clone(&self) -> Self{
        SearchTree { root: Node::deep_clone(&self.root) }
    }
}
