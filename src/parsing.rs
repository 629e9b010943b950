/// a module turns loose calculus notation into strict notation: implicit
/// multiplication is made explicit while derivative heads, limit point
/// groups, integral bound groups and trailing differentials are left intact
/// ________________________________________________________________________________________________________________________________
pub mod normalizer;
///____________________________________________________________________________________________________________________________
/// # Operator grammar
/// regex grammar for the calculus operator heads: d/dx and ∂/∂x with an
/// optional order, ∫ with optional bounds, lim with a point and an
/// optional side suffix
pub mod operator_grammar;
///____________________________________________________________________________________________________________________________
/// # Operation tree
/// recursive descent over normalized input, producing a tree of calculus
/// operations with plain-expression leaves
pub mod operation_tree;
