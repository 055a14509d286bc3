/*!
# Roster API documentation

This page describes the API endpoints available on Roster.

## Ask

Endpoint: `/ask`

Example: `/ask?question=what%20does%20Layla%20love%3F`

Answers a free-text question about members with the text of the most similar
message from the upstream messages API.

### Query Parameters

- `question` - Required. The question to answer. If it contains a capitalized
  word, or two in a row, that is taken to be the name of the member the
  question is about, and messages by or mentioning that member are preferred.

### Response

The response is always a JSON object with a single key, `answer`:

```json
{"answer": "Layla loves jazz"}
```

When no message is similar enough to the question, the answer is
`"I couldn't find a clear answer."`. When the upstream API can't be reached,
answers with an error, or sends something that isn't a list of messages, the
answer is `"Could not fetch data from the API."`. Both of these are successful
(`200`) responses. Both messages can be changed in the `answers` settings.

A request without a `question` is rejected with status `400` and a body like
`{"error": "Malformed query: ..."}`.

## Root

Endpoint: `/`

Describes the service as JSON, with `title`, `description` and `version`
keys. If the `public_documentation` setting is set, this redirects there
instead.

## Dockerflow

These endpoints follow [Dockerflow](https://github.com/mozilla-services/Dockerflow).

- `/__lbheartbeat__` - An empty `200` response, for load balancers.
- `/__heartbeat__` - A JSON object with the running `version` and the
  configured message `source`. The upstream API is not contacted.
- `/__version__` - The contents of `version.json`, describing the build.
- `/__error__` - Always fails with a `500`, to test error handling.
*/
