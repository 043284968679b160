use serde_json::{Value, json};

pub const IMAGE_TEMPLATE: &str = r#"<html><head>
<meta name="template:media-width" content="1080">
<meta name="template:media-height" content="1440">
</head>
<body style="background: {{background:text=https://example.com/bg.jpg}}">
<h1 style="color: {{accent_color:color=#ff0000}}">{{title}}</h1>
<img src="{{image}}"><p>{{text}}</p>
<footer>{{show_footer:bool=true}} {{font_size:number=36}}</footer>
</body></html>"#;

pub const PLAIN_TEMPLATE: &str = "<html><body><p>{{text}}</p></body></html>";

pub fn sample_chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 20, "total_tokens": 32}
    })
}

pub fn sample_model_list() -> Value {
    json!({
        "object": "list",
        "data": [
            {"id": "qwen-max", "object": "model", "created": 0, "owned_by": "system"},
            {"id": "deepseek-chat", "object": "model", "owned_by": "deepseek"}
        ]
    })
}

pub fn sample_system_stats() -> Value {
    json!({
        "system": {
            "os": "nt",
            "python_version": "3.11.9",
            "comfyui_version": "0.3.10",
            "embedded_python": true
        },
        "devices": [{"name": "cuda:0", "type": "cuda", "vram_total": 25769803776u64}]
    })
}
