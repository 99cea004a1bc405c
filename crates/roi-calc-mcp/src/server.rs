use std::io::{self, BufRead, Write};
use std::time::Instant;

use roi_calc_core::{methodology, CalculationResult, ConstantSet, Market, RoiCalculator};
use roi_calc_intake::{validate, validate_step, FieldError, FormData, Step, ValidationErrors};
use roi_calc_report::{reveal_schedule, ResultView};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::stdio::{FrameReader, Inbound};

const DEFAULT_MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const METHODOLOGY_URI_PREFIX: &str = "roi://methodology/";

pub struct McpServer {
    config: ServerConfig,
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        let Some(id) = request.id else {
            debug!(method = %request.method, "notification ignored");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_MCP_PROTOCOL_VERSION);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "serverInfo": {"name": "roi-calc-mcp", "version": env!("CARGO_PKG_VERSION")},
                        "capabilities": {
                            "tools": {
                                "listChanged": false
                            },
                            "resources": {
                                "subscribe": false,
                                "listChanged": false
                            }
                        }
                    }),
                )
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, tools_list_result()),
            "tools/call" => self.handle_tools_call(id, request.params),
            "resources/list" => JsonRpcResponse::success(id, resources_list_result()),
            "resources/read" => handle_resources_read(id, request.params),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found"),
        };

        Some(response)
    }

    fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let parsed: ToolsCallParams = match serde_json::from_value(params) {
            Ok(v) => v,
            Err(err) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
            }
        };

        let start = Instant::now();
        let response = match parsed.name.as_str() {
            "roi_calculate" => self.exec_roi_calculate(id, parsed.arguments),
            "roi_validate" => exec_roi_validate(id, parsed.arguments),
            "roi_methodology" => self.exec_roi_methodology(id, parsed.arguments),
            "roi_markets" => self.exec_roi_markets(id),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "unknown tool"),
        };
        info!(
            tool = %parsed.name,
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            is_error = response.error.is_some(),
            "tool call"
        );
        response
    }

    fn resolve_market(&self, name: Option<&str>) -> Result<Market, JsonRpcResponse> {
        match name {
            None => Ok(self.config.market),
            Some(raw) => raw
                .parse::<Market>()
                .map_err(|err| JsonRpcResponse::error(Value::Null, INVALID_PARAMS, err.to_string())),
        }
    }

    fn exec_roi_calculate(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let args: RoiCalculateInput = match parse_args(arguments) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let market = match self.resolve_market(args.market.as_deref()) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let input = match validate(&args.form) {
            Ok(v) => v,
            Err(errors) => {
                warn!(rejected = errors.len(), "roi_calculate rejected input");
                return validation_error_response(id, &errors);
            }
        };

        let result = RoiCalculator::new(market.constants()).calculate(&input);
        let view = ResultView::build(&result, &self.config.report);
        let formatted = serde_json::to_value(&view).unwrap_or(Value::Null);
        let reveal = serde_json::to_value(reveal_schedule()).unwrap_or(Value::Null);

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": view.render_text()
                }],
                "structuredContent": {
                    "market": market.as_str(),
                    "result": result_json(&result),
                    "formatted": formatted,
                    "reveal": reveal
                }
            }),
        )
    }

    fn exec_roi_methodology(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let args: RoiMethodologyInput = match parse_args_optional(arguments) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let market = match self.resolve_market(args.market.as_deref()) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };
        let constants = market.constants();

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": methodology(constants)
                }],
                "structuredContent": {
                    "market": market.as_str(),
                    "constants": constants_json(constants)
                }
            }),
        )
    }

    fn exec_roi_markets(&self, id: Value) -> JsonRpcResponse {
        let markets = Market::ALL
            .iter()
            .map(|market| {
                json!({
                    "market": market.as_str(),
                    "default": *market == self.config.market,
                    "constants": constants_json(market.constants())
                })
            })
            .collect::<Vec<_>>();

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": format!("{} constant sets, default {}", markets.len(), self.config.market)
                }],
                "structuredContent": {
                    "markets": markets
                }
            }),
        )
    }

    pub fn serve_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Request loop over any reader/writer pair. Each message is either one
    /// JSON line or a `Content-Length` frame; replies mirror the framing.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<()> {
        let mut frames = FrameReader::new(reader);
        while let Some(inbound) = frames.next_message()? {
            let (response, frame) = match inbound {
                Inbound::Message { body, frame } => (self.dispatch(&body), frame),
                Inbound::Rejected { reason, frame } => (
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("invalid stdio frame: {reason}"),
                    )),
                    frame,
                ),
            };
            if let Some(response) = response {
                frame.write(&mut writer, &response)?;
            }
        }
        Ok(())
    }

    fn dispatch(&self, body: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<JsonRpcRequest>(body) {
            Ok(request) => self.handle_request(request),
            Err(err) => {
                warn!(%err, "unparseable request");
                Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {err}"),
                ))
            }
        }
    }
}

fn exec_roi_validate(id: Value, arguments: Option<Value>) -> JsonRpcResponse {
    let args: RoiValidateInput = match parse_args(arguments) {
        Ok(v) => v,
        Err(resp) => return with_id(resp, id),
    };
    if let Some(step) = args.step.filter(|step| step.fields().is_empty()) {
        return JsonRpcResponse::error(
            id,
            INVALID_PARAMS,
            format!("step '{}' has no fields to validate; use team or business", step.as_str()),
        );
    }
    let outcome = match args.step {
        Some(step) => validate_step(&args.form, step),
        None => validate(&args.form).map(|_| ()),
    };
    let errors = match &outcome {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(field_error_json).collect(),
    };
    let step = args.step.map_or("all", Step::as_str);
    let text = match &outcome {
        Ok(()) => format!("{step}: valid"),
        Err(errors) => format!("{step}: {errors}"),
    };

    JsonRpcResponse::success(
        id,
        json!({
            "content": [{
                "type": "text",
                "text": text
            }],
            "structuredContent": {
                "step": step,
                "valid": outcome.is_ok(),
                "errors": errors
            }
        }),
    )
}

fn handle_resources_read(id: Value, params: Value) -> JsonRpcResponse {
    let parsed: ResourceReadParams = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(err) => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
        }
    };

    let market = parsed
        .uri
        .strip_prefix(METHODOLOGY_URI_PREFIX)
        .and_then(|name| name.parse::<Market>().ok());
    let Some(market) = market else {
        return JsonRpcResponse::error(id, INVALID_PARAMS, "unknown resource uri");
    };

    JsonRpcResponse::success(
        id,
        json!({
            "contents": [{
                "uri": parsed.uri,
                "mimeType": "text/plain",
                "text": methodology(market.constants())
            }]
        }),
    )
}

fn resources_list_result() -> Value {
    let resources = Market::ALL
        .iter()
        .map(|market| {
            json!({
                "uri": format!("{METHODOLOGY_URI_PREFIX}{market}"),
                "name": format!("methodology/{market}"),
                "description": format!("Constants behind the {market} loss estimate."),
                "mimeType": "text/plain"
            })
        })
        .collect::<Vec<_>>();
    json!({ "resources": resources })
}

fn tools_list_result() -> Value {
    let form_properties = json!({
        "teamSize": {"type": "number", "minimum": 1},
        "hoursPerDay": {"type": "number", "minimum": 0.5, "maximum": 24},
        "hourlyCost": {"type": "number", "minimum": 1},
        "leadsPerMonth": {"type": "number", "minimum": 1},
        "customerLifetimeValue": {"type": "number", "minimum": 1},
        "currentClosingRate": {"type": "number", "minimum": 0, "maximum": 100},
        "agreeWith20PercentIncrease": {"type": "boolean"},
        "market": {"type": "string", "enum": ["generic", "it"]}
    });
    let mut validate_properties = form_properties.clone();
    if let Some(obj) = validate_properties.as_object_mut() {
        obj.remove("market");
        obj.insert(
            "step".to_string(),
            json!({"type": "string", "enum": ["team", "business"]}),
        );
    }

    json!({
        "tools": [
            {
                "name": "roi_calculate",
                "description": "Estimate the yearly loss from manual work and slow lead response.",
                "inputSchema": {
                    "type": "object",
                    "required": ["teamSize", "hoursPerDay", "hourlyCost", "leadsPerMonth", "customerLifetimeValue"],
                    "properties": form_properties
                }
            },
            {
                "name": "roi_validate",
                "description": "Check intake answers without computing, optionally for one step.",
                "inputSchema": {
                    "type": "object",
                    "properties": validate_properties
                }
            },
            {
                "name": "roi_methodology",
                "description": "Describe the constants used by a market's estimate.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "market": {"type": "string", "enum": ["generic", "it"]}
                    }
                }
            },
            {
                "name": "roi_markets",
                "description": "List the available constant sets.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    })
}

fn validation_error_response(id: Value, errors: &ValidationErrors) -> JsonRpcResponse {
    let details = errors.iter().map(field_error_json).collect::<Vec<_>>();
    JsonRpcResponse::error_with_data(
        id,
        INVALID_PARAMS,
        errors.to_string(),
        Some(json!({ "errors": details })),
    )
}

fn field_error_json(err: &FieldError) -> Value {
    json!({
        "field": err.field().key(),
        "code": err.code(),
        "message": err.to_string(),
        "hint": err.hint()
    })
}

fn result_json(result: &CalculationResult) -> Value {
    json!({
        "totalLoss": result.total_loss,
        "salaryCost": result.salary_cost,
        "missedRevenue": result.missed_revenue,
        "hoursWasted": result.hours_wasted,
        "leadsLost": result.leads_lost
    })
}

fn constants_json(constants: &ConstantSet) -> Value {
    json!({
        "workingWeeksPerYear": constants.working_weeks_per_year,
        "workingDaysPerWeek": constants.working_days_per_week,
        "workingDaysPerYear": constants.working_days_per_year(),
        "aiEfficiencyGain": constants.ai_efficiency_gain,
        "conversionImprovement": constants.conversion_improvement,
        "closingRateCap": constants.closing_rate_cap
    })
}

fn with_id(mut response: JsonRpcResponse, id: Value) -> JsonRpcResponse {
    response.id = id;
    response
}

fn parse_args<T: for<'de> Deserialize<'de>>(
    arguments: Option<Value>,
) -> Result<T, JsonRpcResponse> {
    let Some(args) = arguments else {
        return Err(JsonRpcResponse::error(
            Value::Null,
            INVALID_PARAMS,
            "missing tool arguments",
        ));
    };

    serde_json::from_value(args).map_err(|err| {
        JsonRpcResponse::error(
            Value::Null,
            INVALID_PARAMS,
            format!("invalid tool arguments: {err}"),
        )
    })
}

fn parse_args_optional<T: for<'de> Deserialize<'de> + Default>(
    arguments: Option<Value>,
) -> Result<T, JsonRpcResponse> {
    match arguments {
        Some(v) => serde_json::from_value(v).map_err(|err| {
            JsonRpcResponse::error(
                Value::Null,
                INVALID_PARAMS,
                format!("invalid tool arguments: {err}"),
            )
        }),
        None => Ok(T::default()),
    }
}

#[derive(Debug, Deserialize)]
struct ToolsCallParams {
    name: String,
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct RoiCalculateInput {
    #[serde(flatten)]
    form: FormData,
    #[serde(default)]
    market: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoiValidateInput {
    #[serde(flatten)]
    form: FormData,
    #[serde(default)]
    step: Option<Step>,
}

#[derive(Debug, Default, Deserialize)]
struct RoiMethodologyInput {
    #[serde(default)]
    market: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(server: &McpServer, method: &str, params: Value) -> JsonRpcResponse {
        server
            .handle_request(JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: Some(json!(1)),
                method: method.to_string(),
                params,
            })
            .unwrap_or_else(|| panic!("no response for {method}"))
    }

    #[test]
    fn notifications_get_no_reply() {
        let server = McpServer::default();
        let out = server.handle_request(JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "notifications/initialized".to_string(),
            params: Value::Null,
        });
        assert!(out.is_none());
    }

    #[test]
    fn wrong_version_is_invalid_request() {
        let server = McpServer::default();
        let out = server.handle_request(JsonRpcRequest {
            jsonrpc: "1.0".to_string(),
            id: Some(json!(7)),
            method: "ping".to_string(),
            params: Value::Null,
        });
        let code = out.and_then(|r| r.error).map(|e| e.code);
        assert_eq!(code, Some(INVALID_REQUEST));
    }

    #[test]
    fn unknown_market_is_invalid_params() {
        let server = McpServer::default();
        let out = call(
            &server,
            "tools/call",
            json!({"name": "roi_methodology", "arguments": {"market": "mars"}}),
        );
        assert_eq!(out.id, json!(1));
        assert_eq!(out.error.map(|e| e.code), Some(INVALID_PARAMS));
    }

    #[test]
    fn missing_arguments_are_rejected_with_request_id() {
        let server = McpServer::default();
        let out = call(&server, "tools/call", json!({"name": "roi_calculate"}));
        assert_eq!(out.id, json!(1));
        assert_eq!(
            out.error.map(|e| e.message),
            Some("missing tool arguments".to_string())
        );
    }

    #[test]
    fn validate_schema_drops_market_and_adds_step() {
        let tools = tools_list_result();
        let props = &tools["tools"][1]["inputSchema"]["properties"];
        assert!(props.get("market").is_none());
        assert!(props.get("step").is_some());
        assert!(props.get("teamSize").is_some());
    }
}
