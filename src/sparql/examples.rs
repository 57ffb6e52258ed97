//! Canned queries served by the examples endpoint.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleQuery {
    pub name: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const EXAMPLE_QUERIES: &[ExampleQuery] = &[
    ExampleQuery {
        name: "Get information about Albert Einstein",
        description: "Retrieve basic information about Albert Einstein from DBpedia",
        query: "SELECT ?property ?value WHERE {
  <http://dbpedia.org/resource/Albert_Einstein> ?property ?value .
} LIMIT 10",
    },
    ExampleQuery {
        name: "List 10 scientists",
        description: "Get a list of 10 scientists from DBpedia",
        query: "SELECT ?scientist ?name WHERE {
  ?scientist a <http://dbpedia.org/ontology/Scientist> .
  ?scientist <http://xmlns.com/foaf/0.1/name> ?name .
} LIMIT 10",
    },
    ExampleQuery {
        name: "Count entities by type",
        description: "Count the number of different types of entities",
        query: "SELECT ?type (COUNT(?s) AS ?count) WHERE {
  ?s a ?type .
} GROUP BY ?type ORDER BY DESC(?count) LIMIT 10",
    },
    ExampleQuery {
        name: "Get countries and capitals",
        description: "Retrieve countries with their capital cities",
        query: "SELECT ?country ?countryName ?capital ?capitalName WHERE {
  ?country a <http://dbpedia.org/ontology/Country> .
  ?country <http://xmlns.com/foaf/0.1/name> ?countryName .
  ?country <http://dbpedia.org/ontology/capital> ?capital .
  ?capital <http://xmlns.com/foaf/0.1/name> ?capitalName .
  FILTER (lang(?countryName) = 'en' && lang(?capitalName) = 'en')
} LIMIT 10",
    },
    ExampleQuery {
        name: "Check a fact",
        description: "Ask whether Berlin is the capital of Germany",
        query: "ASK WHERE {
  <http://dbpedia.org/resource/Germany> <http://dbpedia.org/ontology/capital> <http://dbpedia.org/resource/Berlin> .
}",
    },
    ExampleQuery {
        name: "Describe a resource",
        description: "Fetch every triple DBpedia holds about the city of Vienna",
        query: "DESCRIBE <http://dbpedia.org/resource/Vienna>",
    },
];
