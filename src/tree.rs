//! Tree data structure implementation for MCTS

use std::{cell::RefCell, fmt::{self, Debug, Formatter}, rc::{Rc, Weak}};

/// Strong reference to a tree node
pub type NodeRef<T> = Rc<RefCell<Node<T>>>;
/// Weak reference to a tree node (to break reference cycles)
pub type WeakNodeRef<T> = Weak<RefCell<Node<T>>>;

/// A node in the tree structure
///
/// A node owns its children; the parent link is weak, so the root transitively
/// owns the whole tree and dropping it frees every node.
///
/// # Type Parameters
/// - `T`: The data type stored in the node
pub struct Node<T>{
    parent: Option<WeakNodeRef<T>>,
    children: Vec<NodeRef<T>>,
    data: T
}

impl<T> Node<T>{
    /// Creates a new node with given parent and data
    ///
    /// # Parameters
    /// - `parent`: The parent node (None for root)
    /// - `data`: The data to store in this node
    #[inline]
    pub fn new(parent: Option<WeakNodeRef<T>>, data: T) -> Self{
        Node { parent, children: Vec::new(), data }
    }

    /// Creates a new root node with given data
    #[inline]
    pub fn new_root(data: T) -> NodeRef<T>{
        Rc::new(RefCell::new(Node::new(None, data)))
    }

    /// Checks if this node is the root (has no parent)
    #[inline]
    pub fn is_root(&self) -> bool{
        self.parent.is_none()
    }

    /// Checks if this node has no children yet
    #[inline]
    pub fn is_leaf(&self) -> bool{
        self.children.is_empty()
    }

    /// Gets the parent node if it exists and is still alive
    #[inline]
    pub fn get_parent(&self) -> Option<NodeRef<T>>{
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Gets a child node at the specified index (creation order)
    #[inline]
    pub fn get_child(&self, i: usize) -> Option<NodeRef<T>>{
        self.children.get(i).map(Rc::clone)
    }

    /// All children, in creation order
    #[inline]
    pub fn children(&self) -> &[NodeRef<T>]{
        &self.children
    }

    /// Number of children
    #[inline]
    pub fn child_count(&self) -> usize{
        self.children.len()
    }

    /// Appends a new child node
    ///
    /// # Parameters
    /// - `node`: The parent node
    /// - `data`: The data for the new child
    ///
    /// # Returns
    /// Reference to the newly created child node
    #[inline]
    pub fn add_child(node: &NodeRef<T>, data: T) -> NodeRef<T>{
        let ref_node = Rc::new(
            RefCell::new(Node::new(Some(Rc::downgrade(node)), data))
        );

        node.borrow_mut().children.push(Rc::clone(&ref_node));
        ref_node
    }

    /// Gets a reference to the node's data
    #[inline]
    pub fn get(&self) -> &T{
        &self.data
    }

    /// Gets a mutable reference to the node's data
    #[inline]
    pub fn get_mut(&mut self) -> &mut T{
        &mut self.data
    }

    /// Counts this node and all of its descendants
    pub fn subtree_size(node: &NodeRef<T>) -> usize{
        1 + node.borrow().children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// Shows the node's data and how many children it has, without walking the
/// subtree or the parent link.
impl<T: Debug> Debug for Node<T>{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result{
        f.debug_struct("Node")
            .field("data", &self.data)
            .field("children", &self.children.len())
            .finish()
    }
}

impl<T: Clone> Node<T>{
    /// Copies the subtree rooted at `node` into a new, independent tree.
    ///
    /// The copy is a root: its parent link is empty even when `node` has a
    /// parent. Every descendant points to its copied parent, never back into the
    /// source tree.
    pub fn deep_clone(node: &NodeRef<T>) -> NodeRef<T>{
        let copy = Node::new_root(node.borrow().data.clone());
        Self::clone_children(node, &copy);
        copy
    }

    fn clone_children(source: &NodeRef<T>, target: &NodeRef<T>){
        for child in source.borrow().children.iter(){
            let child_copy = Node::add_child(target, child.borrow().data.clone());
            Self::clone_children(child, &child_copy);
        }
    }
}
