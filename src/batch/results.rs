//! Read-only view over a completed run.

use crate::types::{ElapsedTime, Request, RequestId, Response};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// Every request of a run paired with its response, in submission order.
#[derive(Debug, Clone)]
pub struct ResponseList {
    entries: Vec<(Request, Response)>,
    index: HashMap<RequestId, usize>,
    elapsed: ElapsedTime,
}

impl ResponseList {
    pub(crate) fn new(entries: Vec<(Request, Response)>, elapsed: ElapsedTime) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (req, _))| (req.id(), i))
            .collect();
        Self {
            entries,
            index,
            elapsed,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }

    pub fn get(&self, request: &Request) -> Option<&Response> {
        self.get_by_id(request.id())
    }

    pub fn get_by_id(&self, id: RequestId) -> Option<&Response> {
        self.index.get(&id).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Request, &Response)> {
        self.entries.iter().map(|(req, resp)| (req, resp))
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.entries.iter().map(|(req, _)| req)
    }

    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.entries.iter().map(|(_, resp)| resp)
    }

    fn select<'a>(
        &'a self,
        pred: impl Fn(&Request, &Response) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Response> + 'a {
        self.entries
            .iter()
            .filter(move |(req, resp)| pred(req, resp))
            .map(|(_, resp)| resp)
    }

    pub fn successful(&self) -> Vec<&Response> {
        self.select(|_, r| r.successful).collect()
    }

    pub fn first_successful(&self) -> Option<&Response> {
        self.select(|_, r| r.successful).next()
    }

    pub fn failed(&self) -> Vec<&Response> {
        self.select(|_, r| !r.successful).collect()
    }

    pub fn first_failed(&self) -> Option<&Response> {
        self.select(|_, r| !r.successful).next()
    }

    /// Responses with the given status code. `-1` selects failed responses.
    pub fn by_code(&self, code: i32) -> Vec<&Response> {
        self.select(move |_, r| r.code == code).collect()
    }

    pub fn first_by_code(&self, code: i32) -> Option<&Response> {
        self.select(move |_, r| r.code == code).next()
    }

    /// Responses whose originating request URL equals `url` exactly.
    pub fn by_url(&self, url: &str) -> Vec<&Response> {
        let url = url.to_string();
        self.select(move |req, _| req.url == url).collect()
    }

    pub fn first_by_url(&self, url: &str) -> Option<&Response> {
        let url = url.to_string();
        self.select(move |req, _| req.url == url).next()
    }
}

impl Index<&Request> for ResponseList {
    type Output = Response;

    fn index(&self, request: &Request) -> &Response {
        match self.get(request) {
            Some(resp) => resp,
            None => panic!("{} is not part of this response list", request),
        }
    }
}

impl<'a> IntoIterator for &'a ResponseList {
    type Item = (&'a Request, &'a Response);
    type IntoIter = Box<dyn Iterator<Item = (&'a Request, &'a Response)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for ResponseList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ResponseList({} responses)>", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;

    fn ok(code: u16, body: &'static str) -> Response {
        Response::success(
            code,
            Bytes::from_static(body.as_bytes()),
            HeaderMap::new(),
            HashMap::new(),
        )
    }

    fn sample() -> (Vec<Request>, ResponseList) {
        let reqs = vec![
            Request::get("http://a.test/"),
            Request::get("http://b.test/"),
            Request::get("http://a.test/"),
            Request::get("http://slow.test/"),
        ];
        let resps = vec![ok(200, "a1"), ok(404, "b"), ok(200, "a2"), Response::failed("timed out")];
        let list = ResponseList::new(
            reqs.iter().cloned().zip(resps).collect(),
            ElapsedTime::from_secs_f64(0.25),
        );
        (reqs, list)
    }

    #[test]
    fn test_len_and_index() {
        let (reqs, list) = sample();
        assert_eq!(list.len(), 4);
        assert!(!list.is_empty());
        assert_eq!(list[&reqs[1]].code, 404);
        assert_eq!(list.get_by_id(reqs[3].id()).unwrap().code, -1);
        assert!(list.get(&Request::get("http://a.test/")).is_none());
        assert_eq!(list.to_string(), "<ResponseList(4 responses)>");
    }

    #[test]
    #[should_panic(expected = "is not part of this response list")]
    fn test_index_unknown_request_panics() {
        let (_, list) = sample();
        let _ = &list[&Request::get("http://other.test/")];
    }

    #[test]
    fn test_successful_and_failed() {
        let (_, list) = sample();
        let succeeded = list.successful();
        assert_eq!(succeeded.len(), 3);
        assert!(std::ptr::eq(list.first_successful().unwrap(), succeeded[0]));
        assert_eq!(succeeded[0].text, "a1");

        let failed = list.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].code, -1);
        assert!(std::ptr::eq(list.first_failed().unwrap(), failed[0]));
    }

    #[test]
    fn test_by_code_and_url_preserve_order() {
        let (_, list) = sample();
        let texts: Vec<_> = list.by_code(200).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a1", "a2"]);
        assert_eq!(list.first_by_code(404).unwrap().text, "b");
        assert!(list.first_by_code(500).is_none());
        assert!(list.by_code(500).is_empty());

        let texts: Vec<_> = list.by_url("http://a.test/").iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a1", "a2"]);
        assert_eq!(list.first_by_url("http://slow.test/").unwrap().code, -1);
        assert!(list.first_by_url("http://missing.test/").is_none());
    }

    #[test]
    fn test_no_matches_on_empty_list() {
        let list = ResponseList::new(Vec::new(), ElapsedTime::from_secs_f64(0.0));
        assert!(list.is_empty());
        assert!(list.first_successful().is_none());
        assert!(list.successful().is_empty());
        assert!(list.first_failed().is_none());
    }

    #[test]
    fn test_iteration_order() {
        let (reqs, list) = sample();
        let ids: Vec<_> = list.requests().map(|r| r.id()).collect();
        assert_eq!(ids, reqs.iter().map(|r| r.id()).collect::<Vec<_>>());
        assert_eq!((&list).into_iter().count(), 4);
        assert_eq!(list.elapsed().millis(), 250);
    }
}
