use crate::error::GenerateError;
use crate::escape::{sanitize_as_vba_string, PayloadLiteral};
use crate::models::GenerationOptions;
use crate::request::ChatRequest;

/**
 * \brief 渲染完整的 VBA 函数源码。
 *
 * 纯函数：相同输入得到逐字节相同的输出。函数名应已通过 validate 校验。
 * 生成的宏在运行时只对 prompt 做反斜杠与双引号的 JSON 转义，
 * 换行等控制字符不处理，此类 prompt 会得到非法 JSON。
 */
pub fn render_module(
    options: &GenerationOptions,
    request: &ChatRequest,
) -> Result<String, GenerateError> {
    let payload = PayloadLiteral::from_request(request)?.to_vba_expression();
    let name = sanitize_as_vba_string(&options.function_name);
    let url = sanitize_as_vba_string(&options.provider.endpoint_url(options));
    let api_key = sanitize_as_vba_string(&options.api_key);
    let auth_header = options.provider.auth_header_statement();

    Ok(format!(
        r#"
    
Function {name}(prompt As String) As String
    On Error GoTo ErrorHandler ' route any runtime failure to the handler below
    Dim xmlHttp As Object
    Dim url As String
    Dim apiKey As String
    Dim data As String
    Dim response As String
    Dim json As Object

    ' chat completion endpoint
    url = "{url}"

    ' API key
    apiKey = "{api_key}"

    ' escape special characters in the prompt
    prompt = Replace(prompt, "\", "\\")
    prompt = Replace(prompt, """", "\""")

    ' JSON request body
    data = "{payload}"

    ' create the XMLHTTP object
    Set xmlHttp = CreateObject("MSXML2.XMLHTTP")

    ' synchronous POST
    xmlHttp.Open "POST", url, False

    ' request headers
    {auth_header}
    xmlHttp.setRequestHeader "Content-Type", "application/json"

    ' send the request body
    xmlHttp.Send data

    ' keep the raw response
    response = xmlHttp.ResponseText

    ' print the raw response to the Immediate window
    Debug.Print "API Response: " & response

    ' parse the response with JsonConverter
    Set json = JsonConverter.ParseJson(response)

    ' print the parsed content to the Immediate window
    Debug.Print "Parsed JSON: " & json("choices")(1)("message")("content")

    ' return the generated text
    {name} = json("choices")(1)("message")("content")

    ' release objects
    Set xmlHttp = Nothing
    Set json = Nothing
    Exit Function

ErrorHandler:
    {name} = "Error: " & Err.Description
End Function


"#
    ))
}
