use crate::error::ParseError;
use crate::{Graph, NodeId};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res, opt},
    multi::{many0, separated_list0},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use std::fmt::Write;
use std::path::Path;

/// Parse line ending (handles both \n and \r\n)
fn line_ending(input: &str) -> IResult<&str, &str> {
    alt((tag("\n"), tag("\r\n")))(input)
}

/// Parse a single unsigned integer
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// Parse one `start end` line
fn parse_edge(input: &str) -> IResult<&str, (NodeId, NodeId)> {
    delimited(
        space0,
        separated_pair(parse_usize, space1, parse_usize),
        space0,
    )(input)
}

/// Parse the node count header followed by one edge per line
fn parse_edge_list(input: &str) -> IResult<&str, (usize, Vec<(NodeId, NodeId)>)> {
    let (input, n) = delimited(space0, parse_usize, space0)(input)?;
    let (input, edges) = preceded(
        opt(line_ending),
        separated_list0(line_ending, parse_edge),
    )(input)?;
    // Allow trailing blank lines
    let (input, _) = many0(terminated(space0, line_ending))(input)?;

    Ok((input, (n, edges)))
}

/// Parse an edge-list description into a linked graph
pub fn parse_graph(input: &str) -> Result<Graph, ParseError> {
    let (_, (n, edges)) = all_consuming(parse_edge_list)(input)
        .map_err(|e| ParseError::Syntax(e.to_string()))?;

    Ok(Graph::from_edges(n, &edges)?)
}

/// Parse an edge-list file
pub fn parse_graph_file(path: &Path) -> Result<Graph, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_graph(&content)
}

/// Render a graph in the format read by [`parse_graph`]
pub fn format_edge_list(graph: &Graph) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", graph.num_nodes());
    for edge in graph.edges() {
        let _ = writeln!(out, "{} {}", edge.start, edge.end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn test_parse_simple_graph() {
        let g = parse_graph("5\n0 1\n1 2\n2 3\n3 4\n").unwrap();
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.edge(2).unwrap().rank, 4);
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let g = parse_graph("3\r\n0 1\r\n 1  2 \r\n\r\n\n").unwrap();
        assert_eq!(g.num_edges(), 2);
    }

    #[test]
    fn test_header_only() {
        let g = parse_graph("4\n").unwrap();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_graph("3\n0 x\n"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse_graph(""), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_rejects_invalid_structure() {
        assert!(matches!(
            parse_graph("2\n0 5\n"),
            Err(ParseError::Graph(GraphError::EndpointOutOfRange { node: 5, .. }))
        ));
        assert!(matches!(
            parse_graph("2\n1 1\n"),
            Err(ParseError::Graph(GraphError::SelfLoop { .. }))
        ));
    }

    #[test]
    fn test_format_is_parseable() {
        let g = Graph::from_edges(4, &[(0, 3), (3, 1), (1, 0), (2, 0)]).unwrap();
        assert_eq!(parse_graph(&format_edge_list(&g)).unwrap(), g);
    }
}
